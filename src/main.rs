use std::error::Error;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};
use image::RgbaImage;
use log::{debug, info, warn};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use pixelation::config::{EMPTY_WINDOW_SIZE, EXPORT_FILE_NAME, EXPORT_WIDTH_STEP};
use pixelation::{Decoded, GranularityLevel, LoadOutcome, Loader, Session};

/// Session plus the user's choices that outlive a single image.
struct Viewer {
    session: Session,
    loader: Loader,
    inputs: Vec<PathBuf>,
    next_input: usize,
    level: Option<usize>,
    export_width: Option<u32>,
    output: PathBuf,
}

impl Viewer {
    /// Request the next input. With nothing to load this is a no-op.
    fn load_next(&mut self) {
        if self.inputs.is_empty() {
            info!("No image selected.");
            return;
        }
        let path = self.inputs[self.next_input % self.inputs.len()].clone();
        self.next_input += 1;
        info!("Loading {}", path.display());
        let generation = self.session.begin_load();
        self.loader.request(path, generation);
    }

    /// Returns true when the displayed image changed.
    fn apply(&mut self, decoded: Decoded) -> pixelation::Result<bool> {
        let path = decoded.path;
        match self.session.finish_load(decoded.generation, decoded.result)? {
            LoadOutcome::Applied => {
                if let Some(index) = self.level {
                    self.session.select_level(index)?;
                }
                if let Some(width) = self.export_width {
                    self.session.set_export_width(width)?;
                }
                Ok(true)
            }
            LoadOutcome::Superseded => {
                debug!("Ignoring stale load of {}", path.display());
                Ok(false)
            }
        }
    }

    fn grow_export(&mut self, delta: i64) {
        if let Some(size) = self.session.export_size() {
            let width = (size.width as i64 + delta).max(0) as u32;
            report(self.session.set_export_width(width).map(|_| ()));
        }
    }

    fn save(&self) {
        match self.session.export_to(&self.output) {
            Ok(()) => println!("Image saved to {}", self.output.display()),
            Err(e) => warn!("Export failed: {}", e),
        }
    }

    fn title(&self) -> String {
        match self.session.export_size() {
            Some(size) => format!(
                "Pixelation - {} - export {}x{}",
                self.session.label(),
                size.width,
                size.height
            ),
            None => "Pixelation - no image".to_string(),
        }
    }
}

fn report(result: pixelation::Result<()>) {
    if let Err(e) = result {
        warn!("{}", e);
    }
}

fn cli() -> Command {
    Command::new("pixelate")
        .version("0.1")
        .about("Pixelate an image by block mode color and export it.")
        .arg(
            Arg::new("input")
                .help("Images to load; N cycles through them")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Export path. Without --show the image is exported and the program exits."),
        )
        .arg(
            Arg::new("show")
                .help("Display the result in a window.")
                .long("show")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .help("Level index: 0 is 2x2 blocks, 7 is 256x256, 8 is the original.")
                .value_name("INDEX")
                .value_parser(
                    value_parser!(u64).range(0..=GranularityLevel::ORIGINAL_INDEX as u64),
                ),
        )
        .arg(
            Arg::new("export_width")
                .short('w')
                .long("export-width")
                .help("Export width in pixels; height follows the aspect ratio.")
                .value_name("PX")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Prints debug information verbosely.")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> Result<(), Box<dyn Error>> {
    let matches = cli().get_matches();

    let default_filter = if matches.get_flag("verbose") { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("input")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    let output = matches.get_one::<PathBuf>("output").cloned();
    let show = matches.get_flag("show");

    let mut viewer = Viewer {
        session: Session::default(),
        loader: Loader::new(),
        inputs,
        next_input: 0,
        level: matches.get_one::<u64>("level").map(|index| *index as usize),
        export_width: matches.get_one::<u32>("export_width").copied(),
        output: output.clone().unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME)),
    };
    viewer.load_next();

    match output {
        Some(_) if !show => run_headless(viewer),
        _ => show_window(viewer),
    }
}

fn run_headless(mut viewer: Viewer) -> Result<(), Box<dyn Error>> {
    if viewer.inputs.is_empty() {
        return Err("No input image given.".into());
    }
    while !viewer.session.is_loaded() {
        let decoded = viewer.loader.wait().ok_or("Loader stopped")?;
        let path = decoded.path.clone();
        viewer
            .apply(decoded)
            .map_err(|e| format!("Could not load {}: {}", path.display(), e))?;
    }
    viewer.session.export_to(&viewer.output)?;
    println!("Image saved to {}", viewer.output.display());
    Ok(())
}

fn to_frame(img: &RgbaImage) -> Vec<u32> {
    img.pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            (r as u32) << 16 | (g as u32) << 8 | (b as u32) | 0xFF000000
        })
        .collect()
}

fn show_window(mut viewer: Viewer) -> Result<(), Box<dyn Error>> {
    println!("Press ESC to quit.");
    println!("Press LEFT/RIGHT to change the block level.");
    println!("Press UP/DOWN to change the export width.");
    println!("Press N to load the next image.");
    println!("Press S to save the displayed image to {}", viewer.output.display());

    let (width, height) = EMPTY_WINDOW_SIZE;
    let mut window = Window::new(
        "Pixelation",
        width,
        height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    let mut frame = vec![0u32; width * height];
    let mut frame_size = (width, height);
    let mut dirty = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        while let Some(decoded) = viewer.loader.poll() {
            let path = decoded.path.clone();
            match viewer.apply(decoded) {
                Ok(changed) => dirty |= changed,
                Err(e) => warn!("Could not load {}: {}", path.display(), e),
            }
        }

        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            report(viewer.session.step_level(1).map(|_| ()));
            dirty = true;
        }
        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            report(viewer.session.step_level(-1).map(|_| ()));
            dirty = true;
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            viewer.grow_export(EXPORT_WIDTH_STEP as i64);
            dirty = true;
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            viewer.grow_export(-(EXPORT_WIDTH_STEP as i64));
            dirty = true;
        }
        if window.is_key_pressed(Key::N, KeyRepeat::No) {
            viewer.load_next();
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            viewer.save();
        }

        if dirty {
            if let Ok(rendition) = viewer.session.current() {
                frame = to_frame(rendition);
                frame_size = (rendition.width() as usize, rendition.height() as usize);
            }
            window.set_title(&viewer.title());
            if let Some(level) = viewer.session.level() {
                debug!("Showing level {:?} ({})", level.index(), level);
            }
            dirty = false;
        }

        window.update_with_buffer(&frame, frame_size.0, frame_size.1)?;
    }

    Ok(())
}
