use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::encoding::domain::command_runner::{ExternalCommandRunner, RunnerError};
use crate::encoding::domain::encoder_planner::EncoderPlanner;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::schedule::domain::action_schedule::{ActionSchedule, ScheduleError};
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;
use crate::video::domain::video_writer::VideoWriter;

use super::frame_sequence::FrameSequence;
use super::pipeline_error::PipelineError;
use super::progress_reporter::{Phase, ProgressReporter};
use super::run_result::{EncoderPath, RunResult};

/// Run options that are not ports.
#[derive(Clone, Debug)]
pub struct OverlayConfig {
    /// Ordered action labels; matched against the icons case-insensitively.
    pub actions: Vec<String>,
    /// Frames each action stays active; derived from the frame count if unset.
    pub frames_per_action: Option<usize>,
    /// Frame rate for the fallback writer. The external encoder uses the
    /// source's measured rate instead.
    pub fallback_fps: f64,
    /// Parent for the temporary frame directory; system temp dir if unset.
    pub temp_root: Option<PathBuf>,
}

/// States of a run. Each transition consumes the previous state.
enum Stage {
    OpenSource,
    RenderLoop {
        metadata: VideoMetadata,
        schedule: ActionSchedule,
    },
    EncodeAttempt {
        metadata: VideoMetadata,
        schedule: ActionSchedule,
        frames: FrameSequence,
        skipped: Vec<usize>,
    },
    FallbackEncode {
        metadata: VideoMetadata,
        schedule: ActionSchedule,
        cause: PipelineError,
    },
    Finished(RunResult),
}

/// Decodes a video, draws the control overlay on every frame and re-encodes
/// it, preferring the external encoder and falling back to the built-in
/// writer.
///
/// Frames are persisted to a run-private directory that is removed before
/// `execute` returns, whatever the outcome.
pub struct OverlayVideoUseCase {
    reader: Box<dyn VideoReader>,
    fallback_writer: Box<dyn VideoWriter>,
    image_writer: Box<dyn ImageWriter>,
    renderer: Box<dyn OverlayRenderer>,
    runner: Box<dyn ExternalCommandRunner>,
    reporter: Box<dyn ProgressReporter>,
    config: OverlayConfig,
}

impl OverlayVideoUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Box<dyn VideoReader>,
        fallback_writer: Box<dyn VideoWriter>,
        image_writer: Box<dyn ImageWriter>,
        renderer: Box<dyn OverlayRenderer>,
        runner: Box<dyn ExternalCommandRunner>,
        reporter: Box<dyn ProgressReporter>,
        config: OverlayConfig,
    ) -> Self {
        Self {
            reader,
            fallback_writer,
            image_writer,
            renderer,
            runner,
            reporter,
            config,
        }
    }

    pub fn execute(&mut self, input: &Path, output: &Path) -> RunResult {
        let mut stage = Stage::OpenSource;
        loop {
            stage = match stage {
                Stage::OpenSource => self.open_source(input, output),
                Stage::RenderLoop { metadata, schedule } => self.render_loop(metadata, schedule),
                Stage::EncodeAttempt {
                    metadata,
                    schedule,
                    frames,
                    skipped,
                } => self.encode_attempt(metadata, schedule, frames, skipped, output),
                Stage::FallbackEncode {
                    metadata,
                    schedule,
                    cause,
                } => self.fallback_encode(metadata, schedule, cause, input, output),
                Stage::Finished(result) => {
                    self.reader.close();
                    self.reporter.summary();
                    return result;
                }
            };
        }
    }

    fn open_source(&mut self, input: &Path, output: &Path) -> Stage {
        if self.config.actions.is_empty() {
            return fail(output, ScheduleError::EmptyActions.into());
        }

        let metadata = match self.reader.open(input) {
            Ok(m) => m,
            Err(e) => {
                return fail(
                    output,
                    PipelineError::InputOpenFailed {
                        path: input.to_path_buf(),
                        reason: e.to_string(),
                    },
                )
            }
        };

        let schedule = match ActionSchedule::new(
            self.config.actions.clone(),
            metadata.total_frames,
            self.config.frames_per_action,
        ) {
            Ok(s) => s,
            Err(e) => return fail(output, e.into()),
        };

        self.report_properties(&metadata, &schedule);
        Stage::RenderLoop { metadata, schedule }
    }

    fn report_properties(&mut self, metadata: &VideoMetadata, schedule: &ActionSchedule) {
        let duration = metadata
            .duration_secs()
            .map(|d| format!("{d:.2} seconds"))
            .unwrap_or_else(|| "unknown".to_string());
        self.reporter.info(&format!(
            "Video properties: {}x{}, {} frames, {:.2} fps, duration {duration}, codec {}",
            metadata.width,
            metadata.height,
            metadata.total_frames,
            metadata.fps,
            if metadata.codec.is_empty() { "unknown" } else { metadata.codec.as_str() }
        ));
        self.reporter.info(&format!(
            "Actions: {:?}, frames per action: {}",
            schedule.actions(),
            schedule.frames_per_action()
        ));
    }

    fn render_loop(&mut self, metadata: VideoMetadata, schedule: ActionSchedule) -> Stage {
        let mut frames = match FrameSequence::acquire(self.config.temp_root.as_deref()) {
            Ok(f) => f,
            Err(e) => {
                return Stage::FallbackEncode {
                    metadata,
                    schedule,
                    cause: PipelineError::TempDirFailed(e),
                }
            }
        };
        log::debug!("rendering frames into {}", frames.dir().display());

        let total = metadata.total_frames;
        let mut seen = 0usize;
        let mut skipped = Vec::new();

        for (position, item) in self.reader.frames().enumerate() {
            seen = position + 1;
            let mut frame = match item {
                Ok(f) => f,
                Err(e) => {
                    skip_frame(&mut skipped, position, e);
                    continue;
                }
            };

            let started = Instant::now();
            let key = schedule.active_key(frame.index());
            if let Err(e) = self.renderer.render(&mut frame, key) {
                skip_frame(&mut skipped, frame.index(), e);
                continue;
            }
            let rendered_at = Instant::now();
            self.reporter
                .timing("render", ms_between(started, rendered_at));

            match self.image_writer.write(&frames.next_path(), &frame) {
                Ok(()) => frames.commit(),
                Err(e) => skip_frame(&mut skipped, frame.index(), e),
            }
            self.reporter
                .timing("persist", ms_between(rendered_at, Instant::now()));

            self.reporter.progress(Phase::Render, seen, total);
        }
        self.reader.close();

        self.reporter.info(&format!(
            "Rendered {} of {seen} frames, encoding",
            frames.len()
        ));
        Stage::EncodeAttempt {
            metadata,
            schedule,
            frames,
            skipped,
        }
    }

    fn encode_attempt(
        &mut self,
        metadata: VideoMetadata,
        schedule: ActionSchedule,
        frames: FrameSequence,
        skipped: Vec<usize>,
        output: &Path,
    ) -> Stage {
        let rendered = frames.len();
        let started = Instant::now();
        let outcome = self.run_external_encoder(&metadata, &frames, output);
        frames.release();

        match outcome {
            Ok(()) => {
                self.reporter
                    .timing("encode", ms_between(started, Instant::now()));
                self.reporter
                    .info(&format!("Output saved to {}", output.display()));
                Stage::Finished(
                    RunResult::succeeded(output, EncoderPath::ExternalTool, rendered)
                        .with_skipped_frames(skipped),
                )
            }
            Err(cause) => {
                log::warn!("{cause}; falling back to the built-in writer");
                Stage::FallbackEncode {
                    metadata,
                    schedule,
                    cause,
                }
            }
        }
    }

    fn run_external_encoder(
        &self,
        metadata: &VideoMetadata,
        frames: &FrameSequence,
        output: &Path,
    ) -> Result<(), PipelineError> {
        let program = self.runner.program();
        if !self.runner.is_available() {
            return Err(PipelineError::ToolUnavailable { program });
        }

        let plan = EncoderPlanner::new(self.runner.as_ref()).plan(
            output,
            metadata.fps,
            metadata.width,
            metadata.height,
        );
        let args = plan.build_command(&frames.pattern());
        log::info!("Running encoder: {program} {}", args.join(" "));

        let out = self.runner.run(&args).map_err(|e| match e {
            RunnerError::TimedOut { limit, .. } => PipelineError::EncoderTimedOut(limit),
            other => PipelineError::EncodeFailed(other.to_string()),
        })?;

        if !out.success() {
            log::warn!("encoder stderr:\n{}", out.stderr.trim());
            let status = match out.exit_code {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            };
            return Err(PipelineError::EncodeFailed(status));
        }
        Ok(())
    }

    fn fallback_encode(
        &mut self,
        metadata: VideoMetadata,
        schedule: ActionSchedule,
        cause: PipelineError,
        input: &Path,
        output: &Path,
    ) -> Stage {
        self.reader.close();
        if let Err(e) = self.reader.open(input) {
            return fail(
                output,
                PipelineError::InputOpenFailed {
                    path: input.to_path_buf(),
                    reason: format!("could not reopen for fallback: {e}"),
                },
            );
        }

        let writer_metadata = VideoMetadata {
            fps: self.config.fallback_fps,
            ..metadata
        };

        let started = Instant::now();
        match self.write_fallback(&schedule, &writer_metadata, output) {
            Ok((written, skipped)) => {
                self.reporter
                    .timing("fallback", ms_between(started, Instant::now()));
                self.reporter.info(&format!(
                    "Fallback output saved to {} (narrower codec support; install ffmpeg for better results)",
                    output.display()
                ));
                Stage::Finished(
                    RunResult::succeeded(output, EncoderPath::FallbackWriter, written)
                        .with_fallback_reason(&cause)
                        .with_skipped_frames(skipped),
                )
            }
            Err(e) => fail(output, e),
        }
    }

    fn write_fallback(
        &mut self,
        schedule: &ActionSchedule,
        metadata: &VideoMetadata,
        output: &Path,
    ) -> Result<(usize, Vec<usize>), PipelineError> {
        self.fallback_writer.open(output, metadata).map_err(|e| {
            PipelineError::FallbackWriteFailed(format!(
                "could not open {}: {e}",
                output.display()
            ))
        })?;

        let total = metadata.total_frames;
        let mut written = 0usize;
        let mut skipped = Vec::new();
        let mut failure = None;

        for (position, item) in self.reader.frames().enumerate() {
            let mut frame = match item {
                Ok(f) => f,
                Err(e) => {
                    skip_frame(&mut skipped, position, e);
                    continue;
                }
            };
            let key = schedule.active_key(frame.index());
            if let Err(e) = self.renderer.render(&mut frame, key) {
                skip_frame(&mut skipped, frame.index(), e);
                continue;
            }
            if let Err(e) = self.fallback_writer.write(&frame) {
                failure = Some(PipelineError::FallbackWriteFailed(format!(
                    "frame {}: {e}",
                    frame.index()
                )));
                break;
            }
            written += 1;
            self.reporter.progress(Phase::Fallback, written, total);
        }
        self.reader.close();

        let closed = self.fallback_writer.close();
        if let Some(err) = failure {
            return Err(err);
        }
        closed.map_err(|e| {
            PipelineError::FallbackWriteFailed(format!("could not finalise output: {e}"))
        })?;
        Ok((written, skipped))
    }
}

fn fail(output: &Path, error: PipelineError) -> Stage {
    debug_assert!(error.is_terminal(), "{error} should not end the run");
    log::error!("{error}");
    Stage::Finished(RunResult::failed(output, &error))
}

fn skip_frame(skipped: &mut Vec<usize>, index: usize, cause: Box<dyn std::error::Error>) {
    let err = PipelineError::FramePersistFailed {
        index,
        reason: cause.to_string(),
    };
    log::warn!("{err}");
    skipped.push(index);
}

fn ms_between(from: Instant, to: Instant) -> f64 {
    to.duration_since(from).as_secs_f64() * 1000.0
}
