use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Sequential frame-by-frame video encoder.
///
/// Used as the last-resort output path, so implementations only need to
/// support one generic codec.
pub trait VideoWriter: Send {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes pending packets and finalises the container.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
