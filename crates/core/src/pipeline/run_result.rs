use std::path::{Path, PathBuf};

use serde::Serialize;

use super::pipeline_error::PipelineError;

/// Which encoder produced the output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderPath {
    ExternalTool,
    FallbackWriter,
}

/// Terminal outcome of an overlay run.
///
/// On failure the output file may exist in a partially written state;
/// nothing removes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub output_path: PathBuf,
    pub success: bool,
    pub encoder: Option<EncoderPath>,
    pub error: Option<String>,
    /// Why the external encoder was bypassed, when it was.
    pub fallback_reason: Option<String>,
    pub frames_rendered: usize,
    /// Decode positions of frames left out of the output.
    pub skipped_frames: Vec<usize>,
}

impl RunResult {
    pub fn succeeded(output_path: &Path, encoder: EncoderPath, frames_rendered: usize) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            success: true,
            encoder: Some(encoder),
            error: None,
            fallback_reason: None,
            frames_rendered,
            skipped_frames: Vec::new(),
        }
    }

    pub fn failed(output_path: &Path, error: &PipelineError) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            success: false,
            encoder: None,
            error: Some(error.to_string()),
            fallback_reason: None,
            frames_rendered: 0,
            skipped_frames: Vec::new(),
        }
    }

    pub fn with_fallback_reason(mut self, reason: &PipelineError) -> Self {
        self.fallback_reason = Some(reason.to_string());
        self
    }

    pub fn with_skipped_frames(mut self, skipped: Vec<usize>) -> Self {
        self.skipped_frames = skipped;
        self
    }
}
