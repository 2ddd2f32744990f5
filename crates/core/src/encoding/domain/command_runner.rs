use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} did not finish within {limit:?}")]
    TimedOut { program: String, limit: Duration },
    #[error("i/o error while running {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured result of one external command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability interface over the external encoder binary.
///
/// Probes are best-effort: any failure is reported as "not available",
/// "unknown version" or "codec missing", never as an error.
pub trait ExternalCommandRunner: Send {
    /// Program name or path, for log messages.
    fn program(&self) -> String;

    /// Whether the tool can be launched and answers its version query.
    fn is_available(&self) -> bool;

    /// Major version reported by the tool, if it can be determined.
    fn probe_version(&self) -> Option<u32>;

    /// Whether the tool's codec listing mentions `name`.
    fn has_codec(&self, name: &str) -> bool;

    /// Runs the tool with `args` and captures its output.
    fn run(&self, args: &[String]) -> Result<CommandOutput, RunnerError>;
}
