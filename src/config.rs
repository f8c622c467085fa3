//! Static configuration shared by the engine, the session and the viewer.

use image::imageops::FilterType;

/// Block counts offered by the level selector, coarsest first.
/// The index one past the last entry selects the original image.
pub const BLOCK_LEVELS: [u32; 8] = [2, 4, 8, 16, 32, 64, 128, 256];

/// Smallest export dimension accepted, in pixels.
pub const EXPORT_MIN: u32 = 1;

/// Largest export dimension accepted, in pixels.
pub const EXPORT_MAX: u32 = 2048;

/// How much one key press changes the export width in the viewer.
pub const EXPORT_WIDTH_STEP: u32 = 64;

pub const EXPORT_FILE_NAME: &str = "pixelated.png";

/// Filter used when scaling a rendition to the export size.
/// Bilinear, like a 2D canvas drawing a scaled image.
pub const EXPORT_FILTER: FilterType = FilterType::Triangle;

/// Window size used while no image has been loaded yet.
pub const EMPTY_WINDOW_SIZE: (usize, usize) = (512, 512);
