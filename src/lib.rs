pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod level;
pub mod loader;
mod pixelizer;
pub mod session;

pub use cache::RenditionCache;
pub use error::{PixelateError, Result};
pub use export::{export, export_to, ExportSize};
pub use level::GranularityLevel;
pub use loader::{decode_bytes, decode_file, Decoded, Loader};
pub use pixelizer::mode_pixelizer::ModePixelizer;
pub use pixelizer::{pixelate, Block, BlockGrid, Pixelizer};
pub use session::{DisplayState, Generation, LoadOutcome, LoadedImage, Session};

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use crate::{pixelate, Session};

    #[test]
    fn pixelate_raw_matches_session_level() {
        let img = RgbaImage::from_fn(9, 6, |x, y| Rgba([(x * 20) as u8, (y * 30) as u8, 0, 255]));
        let raw = pixelate(img.as_raw(), 9, 6, 4).unwrap();

        let mut session: Session = Session::default();
        let generation = session.begin_load();
        session.finish_load(generation, Ok(img)).unwrap();
        session.select_level(1).unwrap();
        assert_eq!(session.current().unwrap().as_raw(), &raw);
    }
}
