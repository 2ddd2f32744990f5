use std::path::Path;

use crate::shared::constants::PRIMARY_CODEC;

use super::command_runner::ExternalCommandRunner;
use super::encoder_plan::{CodecPath, ContainerKind, EncoderPlan, VersionTier};

/// Probes the external encoder and resolves an [`EncoderPlan`].
///
/// Probe failures only narrow the argument set: an unknown version is
/// treated as the legacy tier, and a missing (or unprobeable) primary codec
/// swaps in the generic quality argument within the same plan.
pub struct EncoderPlanner<'a> {
    runner: &'a dyn ExternalCommandRunner,
}

impl<'a> EncoderPlanner<'a> {
    pub fn new(runner: &'a dyn ExternalCommandRunner) -> Self {
        Self { runner }
    }

    pub fn plan(&self, output_path: &Path, fps: f64, width: u32, height: u32) -> EncoderPlan {
        let major = self.runner.probe_version();
        let tier = VersionTier::from_major(major);
        match major {
            Some(v) => log::debug!("{} major version {v} ({tier:?} tier)", self.runner.program()),
            None => log::debug!("{} version unknown, using legacy arguments", self.runner.program()),
        }

        let container = ContainerKind::from_path(output_path);
        let codec = match container {
            ContainerKind::Webm => CodecPath::Alternate,
            ContainerKind::Mp4 | ContainerKind::Avi => {
                if self.runner.has_codec(PRIMARY_CODEC) {
                    CodecPath::Primary
                } else {
                    log::info!("{PRIMARY_CODEC} not available, using the default codec with a quality scale");
                    CodecPath::GenericQuality
                }
            }
        };

        EncoderPlan {
            container,
            codec,
            tier,
            fps,
            width,
            height,
            output_path: output_path.to_path_buf(),
        }
    }
}
