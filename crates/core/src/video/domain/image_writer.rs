use std::path::Path;

use crate::shared::frame::Frame;

/// Persists a single frame as a lossless still image.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
