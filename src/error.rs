//! Error types for pixelation, loading and export.

use image::ImageError;

/// Errors that can occur while pixelating, loading or exporting an image.
#[derive(Debug, thiserror::Error)]
pub enum PixelateError {
    /// Engine or session called outside its documented preconditions
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Source could not be decoded as an image
    #[error("Failed to decode image: {0}")]
    DecodeFailure(#[source] ImageError),

    /// Rendition could not be encoded to the export format
    #[error("Failed to encode image: {0}")]
    Encode(#[source] ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation needed a loaded image but the session is empty
    #[error("No image loaded")]
    NoImage,
}

pub type Result<T> = std::result::Result<T, PixelateError>;
