//! Background image decoding.
//!
//! Each request decodes on its own worker thread and reports back through a
//! channel, tagged with the generation it was requested for. Nothing here
//! decides whether a result is still wanted; that is the session's job.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use image::RgbaImage;
use log::{debug, warn};

use crate::error::{PixelateError, Result};
use crate::session::Generation;

/// A finished decode.
#[derive(Debug)]
pub struct Decoded {
    pub generation: Generation,
    pub path: PathBuf,
    pub result: Result<RgbaImage>,
}

pub fn decode_file(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(PixelateError::DecodeFailure)?;
    Ok(img.to_rgba8())
}

pub fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes).map_err(PixelateError::DecodeFailure)?;
    Ok(img.to_rgba8())
}

pub struct Loader {
    sender: Sender<Decoded>,
    receiver: Receiver<Decoded>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Start decoding `path` for `generation`.
    pub fn request(&self, path: PathBuf, generation: Generation) {
        debug!("decoding {} for generation {:?}", path.display(), generation);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = decode_file(&path);
            if sender.send(Decoded { generation, path, result }).is_err() {
                warn!("loader dropped before decode finished");
            }
        });
    }

    /// Next finished decode, if any, without blocking.
    pub fn poll(&self) -> Option<Decoded> {
        self.receiver.try_recv().ok()
    }

    /// Block until the next decode finishes.
    pub fn wait(&self) -> Option<Decoded> {
        self.receiver.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{decode_bytes, Loader};
    use crate::error::PixelateError;
    use crate::session::Session;

    #[test]
    fn decodes_file_on_worker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.png");
        let img = RgbaImage::from_pixel(6, 4, Rgba([1, 2, 3, 255]));
        img.save(&path).unwrap();

        let mut session: Session = Session::default();
        let loader = Loader::new();
        let generation = session.begin_load();
        loader.request(path.clone(), generation);

        let decoded = loader.wait().unwrap();
        assert_eq!(decoded.generation, generation);
        assert_eq!(decoded.path, path);
        assert_eq!(decoded.result.unwrap(), img);
    }

    #[test]
    fn missing_file_is_a_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let loader = Loader::new();
        let mut session: Session = Session::default();
        let generation = session.begin_load();
        loader.request(dir.path().join("missing.png"), generation);
        let decoded = loader.wait().unwrap();
        assert!(matches!(decoded.result, Err(PixelateError::DecodeFailure(_))));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_bytes(b"definitely not an image"),
            Err(PixelateError::DecodeFailure(_))
        ));
    }

    #[test]
    fn poll_is_empty_without_requests() {
        assert!(Loader::new().poll().is_none());
    }
}
