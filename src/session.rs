//! Display state for the currently loaded image.
//!
//! A session is either empty or holds one loaded image with all of its
//! renditions. Loads are two-phase: [`Session::begin_load`] hands out a
//! generation token, and [`Session::finish_load`] only applies a result that
//! carries the latest token. Older completions are dropped, so a slow decode
//! can never replace the image that superseded it.

use std::path::Path;

use image::RgbaImage;
use log::{info, warn};

use crate::cache::RenditionCache;
use crate::error::{PixelateError, Result};
use crate::export::{self, ExportSize};
use crate::level::GranularityLevel;
use crate::pixelizer::mode_pixelizer::ModePixelizer;
use crate::pixelizer::Pixelizer;

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// What `finish_load` did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was requested; the completion was discarded.
    Superseded,
}

/// One loaded image and everything derived from it.
pub struct LoadedImage {
    generation: Generation,
    cache: RenditionCache,
    level: GranularityLevel,
    export_size: ExportSize,
}

impl LoadedImage {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn cache(&self) -> &RenditionCache {
        &self.cache
    }
}

pub enum DisplayState {
    Empty,
    Loaded(LoadedImage),
}

pub struct Session<P: Pixelizer = ModePixelizer> {
    pixelizer: P,
    latest: Generation,
    state: DisplayState,
}

impl Default for Session<ModePixelizer> {
    fn default() -> Self {
        Self::new(ModePixelizer)
    }
}

impl<P: Pixelizer> Session<P> {
    pub fn new(pixelizer: P) -> Self {
        Self {
            pixelizer,
            latest: Generation(0),
            state: DisplayState::Empty,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, DisplayState::Loaded(_))
    }

    /// Start a new load. Any load started earlier is superseded.
    pub fn begin_load(&mut self) -> Generation {
        self.latest = Generation(self.latest.0 + 1);
        self.latest
    }

    /// Apply the result of the load started as `generation`.
    ///
    /// Stale results are discarded. A failed decode leaves the current image
    /// (if any) in place and is returned as an error.
    pub fn finish_load(
        &mut self,
        generation: Generation,
        result: Result<RgbaImage>,
    ) -> Result<LoadOutcome> {
        if generation != self.latest {
            warn!(
                "discarding load {:?}, superseded by {:?}",
                generation, self.latest
            );
            return Ok(LoadOutcome::Superseded);
        }

        let source = result?;
        if source.width() == 0 || source.height() == 0 {
            return Err(PixelateError::InvalidArgument(format!(
                "decoded image has no pixels ({}x{})",
                source.width(),
                source.height()
            )));
        }

        let (width, height) = source.dimensions();
        let cache = RenditionCache::build(&self.pixelizer, source)?;
        self.state = DisplayState::Loaded(LoadedImage {
            generation,
            cache,
            level: GranularityLevel::Original,
            export_size: ExportSize::new(width, height),
        });
        info!("loaded {}x{} image as {:?}", width, height, generation);
        Ok(LoadOutcome::Applied)
    }

    fn loaded(&self) -> Result<&LoadedImage> {
        match &self.state {
            DisplayState::Loaded(loaded) => Ok(loaded),
            DisplayState::Empty => Err(PixelateError::NoImage),
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedImage> {
        match &mut self.state {
            DisplayState::Loaded(loaded) => Ok(loaded),
            DisplayState::Empty => Err(PixelateError::NoImage),
        }
    }

    pub fn level(&self) -> Option<GranularityLevel> {
        self.loaded().ok().map(|loaded| loaded.level)
    }

    /// Show the level at `index` in selector order.
    pub fn select_level(&mut self, index: usize) -> Result<GranularityLevel> {
        let level = GranularityLevel::from_index(index)?;
        self.loaded_mut()?.level = level;
        Ok(level)
    }

    /// Move the selector by `delta` positions, stopping at either end.
    pub fn step_level(&mut self, delta: isize) -> Result<GranularityLevel> {
        let current = self
            .loaded()?
            .level
            .index()
            .unwrap_or(GranularityLevel::ORIGINAL_INDEX);
        let next = current
            .saturating_add_signed(delta)
            .min(GranularityLevel::ORIGINAL_INDEX);
        self.select_level(next)
    }

    /// Label of the shown level, empty when no image is loaded.
    pub fn label(&self) -> String {
        self.level().map(|level| level.label()).unwrap_or_default()
    }

    /// The rendition currently on display.
    pub fn current(&self) -> Result<&RgbaImage> {
        let loaded = self.loaded()?;
        loaded.cache.get(loaded.level)
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.loaded().ok().map(|loaded| loaded.cache.dimensions())
    }

    pub fn export_size(&self) -> Option<ExportSize> {
        self.loaded().ok().map(|loaded| loaded.export_size)
    }

    /// Set the export width; the height follows the source aspect ratio.
    pub fn set_export_width(&mut self, width: u32) -> Result<ExportSize> {
        let loaded = self.loaded_mut()?;
        loaded.export_size = ExportSize::with_width(width, loaded.cache.dimensions());
        Ok(loaded.export_size)
    }

    /// Encode the displayed rendition at the export size.
    pub fn export(&self) -> Result<Vec<u8>> {
        let loaded = self.loaded()?;
        export::export(loaded.cache.get(loaded.level)?, loaded.export_size)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        let loaded = self.loaded()?;
        export::export_to(loaded.cache.get(loaded.level)?, loaded.export_size, path)
    }
}
