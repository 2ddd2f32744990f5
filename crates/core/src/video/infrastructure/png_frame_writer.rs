use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Saves frames as PNG through the `image` crate.
pub struct PngFrameWriter;

impl PngFrameWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngFrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for PngFrameWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}
