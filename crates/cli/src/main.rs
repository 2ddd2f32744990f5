use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use control_overlay_core::encoding::domain::command_runner::ExternalCommandRunner;
use control_overlay_core::encoding::domain::encoder_plan::VersionTier;
use control_overlay_core::encoding::infrastructure::ffmpeg_cli_runner::FfmpegCliRunner;
use control_overlay_core::overlay::infrastructure::control_icon_renderer::ControlIconRenderer;
use control_overlay_core::pipeline::overlay_video_use_case::{OverlayConfig, OverlayVideoUseCase};
use control_overlay_core::pipeline::progress_reporter::LogProgressReporter;
use control_overlay_core::pipeline::run_result::RunResult;
use control_overlay_core::schedule::domain::action_schedule::parse_action_list;
use control_overlay_core::shared::constants::DEFAULT_ENCODER_PROGRAM;
use control_overlay_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use control_overlay_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;
use control_overlay_core::video::infrastructure::png_frame_writer::PngFrameWriter;

const INSTALL_HINTS: &[&str] = &[
    "  Ubuntu/Debian: sudo apt update && sudo apt install ffmpeg",
    "  CentOS/RHEL: sudo yum install ffmpeg",
    "  macOS: brew install ffmpeg",
    "  Windows: download from https://ffmpeg.org/download.html",
    "  Or with conda: conda install ffmpeg",
];

/// Overlay WASD control indicators on a video.
#[derive(Parser)]
#[command(name = "control-overlay")]
struct Cli {
    /// Input video file.
    #[arg(long, env = "INPUT_VIDEO", required_unless_present = "check_encoder")]
    input: Option<PathBuf>,

    /// Output file (defaults to <input stem>_icon.<ext> beside the input).
    #[arg(long, env = "OUTPUT_VIDEO")]
    output: Option<PathBuf>,

    /// Space-separated action labels, one per segment (w, a, s, d).
    #[arg(long, env = "ACTION_LIST", default_value = "w a a a a")]
    actions: String,

    /// Frame rate used by the built-in fallback writer.
    #[arg(long, env = "FPS", default_value = "24")]
    fps: f64,

    /// Frames each action stays highlighted (derived from the frame count if unset).
    #[arg(long)]
    frames_per_action: Option<usize>,

    /// External encoder program.
    #[arg(long = "ffmpeg", env = "FFMPEG_BIN", default_value = DEFAULT_ENCODER_PROGRAM)]
    ffmpeg: PathBuf,

    /// Kill the external encoder after this many seconds (0 = no limit).
    #[arg(long, default_value = "0")]
    encoder_timeout: u64,

    /// Write the run result as JSON to this path.
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Report whether the external encoder is usable, then exit.
    #[arg(long)]
    check_encoder: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let runner = build_runner(&cli);

    if cli.check_encoder {
        let available = check_encoder(&runner);
        if !available {
            return Err(format!("{} is not usable", runner.program()).into());
        }
        return Ok(());
    }

    let input = validate(&cli)?;
    let output = cli.output.clone().unwrap_or_else(|| default_output(&input));

    log::info!("Input: {}", input.display());
    log::info!("Output: {}", output.display());
    log::info!("Actions: {}", cli.actions);
    log::info!("Fallback FPS: {}", cli.fps);

    let config = OverlayConfig {
        actions: parse_action_list(&cli.actions),
        frames_per_action: cli.frames_per_action,
        fallback_fps: cli.fps,
        temp_root: None,
    };

    let mut use_case = OverlayVideoUseCase::new(
        Box::new(FfmpegReader::new()),
        Box::new(FfmpegWriter::new()),
        Box::new(PngFrameWriter::new()),
        Box::new(ControlIconRenderer::new()),
        Box::new(runner),
        Box::new(LogProgressReporter::default()),
        config,
    );
    let result = use_case.execute(&input, &output);
    finish(result, cli.report_json.as_deref())
}

/// Maps the run outcome to the process result. A report that cannot be
/// written is only a warning and never replaces the run's own error.
fn finish(result: RunResult, report: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = report {
        if let Err(e) = write_report(path, &result) {
            log::warn!("could not write run report to {}: {e}", path.display());
        }
    }

    match result.error {
        Some(error) => Err(error.into()),
        None => {
            log::info!("Output written to {}", result.output_path.display());
            Ok(())
        }
    }
}

fn build_runner(cli: &Cli) -> FfmpegCliRunner {
    let timeout = (cli.encoder_timeout > 0).then(|| Duration::from_secs(cli.encoder_timeout));
    FfmpegCliRunner::new()
        .with_program(&cli.ffmpeg)
        .with_timeout(timeout)
}

fn check_encoder(runner: &dyn ExternalCommandRunner) -> bool {
    let available = runner.is_available();
    let version = if available {
        runner.probe_version()
    } else {
        None
    };
    for line in encoder_report(available, version) {
        println!("{line}");
    }
    available
}

fn encoder_report(available: bool, version: Option<u32>) -> Vec<String> {
    if !available {
        let mut lines = vec![
            "✗ FFmpeg not found".to_string(),
            String::new(),
            "To install FFmpeg:".to_string(),
        ];
        lines.extend(INSTALL_HINTS.iter().map(|h| h.to_string()));
        lines.push(String::new());
        lines.push("Without it, output falls back to the built-in MPEG-4 writer.".to_string());
        return lines;
    }

    let line = match version {
        Some(major) => match VersionTier::from_major(Some(major)) {
            VersionTier::Modern => {
                format!("✓ FFmpeg is available (version {major}.x) - Full feature support")
            }
            VersionTier::Legacy => {
                format!("✓ FFmpeg is available (version {major}.x) - Basic compatibility mode")
            }
        },
        None => "✓ FFmpeg is available (version unknown)".to_string(),
    };
    vec![line]
}

fn validate(cli: &Cli) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let input = cli.input.clone().ok_or("Input video is required")?;
    if !input.exists() {
        return Err(format!("Input video not found: {}", input.display()).into());
    }
    if cli.fps.is_nan() || cli.fps <= 0.0 {
        return Err(format!("FPS must be positive, got {}", cli.fps).into());
    }
    if parse_action_list(&cli.actions).is_empty() {
        return Err("Action list must contain at least one action".into());
    }
    if cli.frames_per_action == Some(0) {
        return Err("Frames per action must be positive".into());
    }
    Ok(input)
}

/// `<stem>_icon.<ext>` beside the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}_icon.{}", ext.to_string_lossy()),
        None => format!("{stem}_icon"),
    };
    input.with_file_name(name)
}

fn write_report(path: &Path, result: &RunResult) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    log::info!("Run report written to {}", path.display());
    Ok(())
}
