use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::schedule::domain::action_schedule::ScheduleError;

/// Failure conditions of an overlay run.
///
/// Only `InputOpenFailed`, `FallbackWriteFailed` and `InvalidActions` end a
/// run. Encoder-side errors move the run to the fallback writer, and
/// `FramePersistFailed` skips a single frame.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("could not open input video {path}: {reason}")]
    InputOpenFailed { path: PathBuf, reason: String },
    #[error("invalid action list: {0}")]
    InvalidActions(#[from] ScheduleError),
    #[error("external encoder {program} is not available")]
    ToolUnavailable { program: String },
    #[error("external encoder failed: {0}")]
    EncodeFailed(String),
    #[error("external encoder timed out after {0:?}")]
    EncoderTimedOut(Duration),
    #[error("could not create temporary frame directory: {0}")]
    TempDirFailed(#[source] std::io::Error),
    #[error("fallback writer failed: {0}")]
    FallbackWriteFailed(String),
    #[error("frame {index} skipped: {reason}")]
    FramePersistFailed { index: usize, reason: String },
}

impl PipelineError {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineError::InputOpenFailed { .. }
                | PipelineError::FallbackWriteFailed(_)
                | PipelineError::InvalidActions(_)
        )
    }
}
