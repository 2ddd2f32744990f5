use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::encoding::domain::command_runner::{CommandOutput, ExternalCommandRunner, RunnerError};
use crate::encoding::domain::encoder_plan::parse_major_version;
use crate::shared::constants::DEFAULT_ENCODER_PROGRAM;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the system `ffmpeg` binary as a blocking subprocess.
///
/// stdout and stderr are drained on helper threads so a chatty encoder
/// cannot fill a pipe and stall. With a timeout set, the child is killed
/// once the limit expires.
pub struct FfmpegCliRunner {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegCliRunner {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_ENCODER_PROGRAM),
            timeout: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn capture<S: AsRef<str>>(&self, args: &[S]) -> Result<CommandOutput, RunnerError> {
        let program = self.program();
        let mut child = Command::new(&self.program)
            .args(args.iter().map(|a| a.as_ref()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit, &program)?,
            None => child.wait().map_err(|source| RunnerError::Io {
                program: program.clone(),
                source,
            })?,
        };

        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }
}

impl Default for FfmpegCliRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalCommandRunner for FfmpegCliRunner {
    fn program(&self) -> String {
        self.program.display().to_string()
    }

    fn is_available(&self) -> bool {
        self.capture(&["-version"])
            .map(|out| out.success())
            .unwrap_or(false)
    }

    fn probe_version(&self) -> Option<u32> {
        match self.capture(&["-version"]) {
            Ok(out) if out.success() => out.stdout.lines().next().and_then(parse_major_version),
            Ok(out) => {
                log::debug!("version probe exited with {:?}", out.exit_code);
                None
            }
            Err(e) => {
                log::debug!("version probe failed: {e}");
                None
            }
        }
    }

    fn has_codec(&self, name: &str) -> bool {
        match self.capture(&["-codecs"]) {
            Ok(out) => out.stdout.contains(name),
            Err(e) => {
                log::debug!("codec probe failed: {e}");
                false
            }
        }
    }

    fn run(&self, args: &[String]) -> Result<CommandOutput, RunnerError> {
        self.capture(args)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn wait_with_deadline(
    child: &mut Child,
    limit: Duration,
    program: &str,
) -> Result<ExitStatus, RunnerError> {
    let start = Instant::now();
    loop {
        let polled = child.try_wait().map_err(|source| RunnerError::Io {
            program: program.to_string(),
            source,
        })?;
        if let Some(status) = polled {
            return Ok(status);
        }
        if start.elapsed() >= limit {
            log::warn!("{program} exceeded {limit:?}, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(RunnerError::TimedOut {
                program: program.to_string(),
                limit,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}
