//! Pixelated renditions of one source image, one per granularity level.

use std::time::Instant;

use image::RgbaImage;
use log::debug;

use crate::config::BLOCK_LEVELS;
use crate::error::{PixelateError, Result};
use crate::level::GranularityLevel;
use crate::pixelizer::Pixelizer;

/// Every level of one source image, computed eagerly so that switching
/// levels is a lookup.
pub struct RenditionCache {
    source: RgbaImage,
    /// Indexed like `BLOCK_LEVELS`
    renditions: Vec<RgbaImage>,
}

impl RenditionCache {
    pub fn build<P: Pixelizer + ?Sized>(pixelizer: &P, source: RgbaImage) -> Result<Self> {
        let started = Instant::now();
        let renditions = BLOCK_LEVELS
            .iter()
            .map(|blocks| pixelizer.pixelize(&source, *blocks))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "built {} renditions for {}x{} in {:?}",
            renditions.len(),
            source.width(),
            source.height(),
            started.elapsed()
        );
        Ok(Self { source, renditions })
    }

    pub fn source(&self) -> &RgbaImage {
        &self.source
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// Rendition for `level`. The original level returns the source as
    /// decoded.
    pub fn get(&self, level: GranularityLevel) -> Result<&RgbaImage> {
        match level {
            GranularityLevel::Original => Ok(&self.source),
            GranularityLevel::Blocks(blocks) => level
                .index()
                .and_then(|i| self.renditions.get(i))
                .ok_or_else(|| {
                    PixelateError::InvalidArgument(format!(
                        "{} blocks is not a cached level",
                        blocks
                    ))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::RenditionCache;
    use crate::level::GranularityLevel;
    use crate::pixelizer::mode_pixelizer::ModePixelizer;
    use crate::pixelizer::Pixelizer;

    fn stripes() -> RgbaImage {
        RgbaImage::from_fn(40, 30, |x, y| {
            Rgba([(x * 6) as u8, (y * 8) as u8, ((x + y) % 3) as u8 * 80, 200])
        })
    }

    #[test]
    fn cached_levels_match_fresh_computation() {
        let source = stripes();
        let cache = RenditionCache::build(&ModePixelizer, source.clone()).unwrap();
        for level in GranularityLevel::all() {
            let cached = cache.get(level).unwrap();
            let fresh = match level.blocks() {
                Some(blocks) => ModePixelizer.pixelize(&source, blocks).unwrap(),
                None => source.clone(),
            };
            assert_eq!(cached, &fresh, "level {}", level);
        }
    }

    #[test]
    fn original_is_the_untouched_source() {
        let source = stripes();
        let cache = RenditionCache::build(&ModePixelizer, source.clone()).unwrap();
        assert_eq!(cache.get(GranularityLevel::Original).unwrap(), &source);
        assert_eq!(cache.dimensions(), (40, 30));
    }

    #[test]
    fn unknown_block_count_is_rejected() {
        let cache = RenditionCache::build(&ModePixelizer, stripes()).unwrap();
        assert!(cache.get(GranularityLevel::Blocks(5)).is_err());
    }
}
