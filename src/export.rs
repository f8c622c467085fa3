//! Resampling and PNG encoding of a rendition.

use std::io::Cursor;
use std::path::Path;

use image::{imageops, ImageFormat, RgbaImage};
use log::info;

use crate::config::{EXPORT_FILTER, EXPORT_MAX, EXPORT_MIN};
use crate::error::{PixelateError, Result};

/// Target size of an exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSize {
    pub width: u32,
    pub height: u32,
}

fn clamp_dimension(value: u32) -> u32 {
    value.clamp(EXPORT_MIN, EXPORT_MAX)
}

impl ExportSize {
    /// Size with both dimensions clamped to the export range.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
        }
    }

    /// Size of the given width whose height follows the aspect ratio of
    /// `source`.
    pub fn with_width(width: u32, source: (u32, u32)) -> Self {
        let width = clamp_dimension(width);
        let (src_w, src_h) = source;
        let height = if src_w == 0 {
            width
        } else {
            (width as f64 * src_h as f64 / src_w as f64).round() as u32
        };
        Self {
            width,
            height: clamp_dimension(height),
        }
    }
}

/// Scale `rendition` to `size` with an interpolating filter.
pub fn resample(rendition: &RgbaImage, size: ExportSize) -> RgbaImage {
    if rendition.dimensions() == (size.width, size.height) {
        return rendition.clone();
    }
    imageops::resize(rendition, size.width, size.height, EXPORT_FILTER)
}

/// Resample `rendition` to `size` and encode it as PNG.
pub fn export(rendition: &RgbaImage, size: ExportSize) -> Result<Vec<u8>> {
    if size.width == 0 || size.height == 0 {
        return Err(PixelateError::InvalidArgument(format!(
            "export size must be positive, got {}x{}",
            size.width, size.height
        )));
    }
    let scaled = resample(rendition, size);
    let mut bytes = Cursor::new(Vec::new());
    scaled
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(PixelateError::Encode)?;
    Ok(bytes.into_inner())
}

pub fn export_to(rendition: &RgbaImage, size: ExportSize, path: &Path) -> Result<()> {
    let bytes = export(rendition, size)?;
    std::fs::write(path, bytes)?;
    info!(
        "exported {}x{} to {}",
        size.width,
        size.height,
        path.display()
    );
    Ok(())
}
