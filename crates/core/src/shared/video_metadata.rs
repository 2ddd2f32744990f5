/// Properties of an opened source video. Immutable for the lifetime of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Container-reported frame count; 0 means unknown (e.g. streamed input).
    pub total_frames: usize,
    /// Decoder name, for diagnostics.
    pub codec: String,
}

impl VideoMetadata {
    /// Duration in seconds, or `None` when the frame rate is not positive.
    pub fn duration_secs(&self) -> Option<f64> {
        (self.fps > 0.0).then(|| self.total_frames as f64 / self.fps)
    }
}
