//! Command runner port.
//!
//! Executes one external program per call and reports how it ended. A
//! timeout or a non-zero exit is an ordinary outcome carried in
//! [`CommandOutput`]; only failing to start or observe the process is a
//! [`RunnerError`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Hard wall-clock limit for a single command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Diagnostic text reported for a command that hit its timeout.
pub const TIMED_OUT_MESSAGE: &str = "Command timed out";

/// A program invocation. Arguments are passed verbatim, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandExit {
    Success,
    /// Non-zero exit. `code` is `None` when the process died from a signal.
    Failed { code: Option<i32> },
    /// Killed after exceeding its timeout.
    TimedOut { after: Duration },
}

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit: CommandExit,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit, CommandExit::Success)
    }

    #[must_use]
    pub const fn timed_out(&self) -> bool {
        matches!(self.exit, CommandExit::TimedOut { .. })
    }

    /// Best text explaining a failure: stderr, then stdout, then the exit code.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        if self.timed_out() {
            return TIMED_OUT_MESSAGE.to_string();
        }

        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }

        match self.exit {
            CommandExit::Failed { code: Some(code) } => format!("exited with status {code}"),
            CommandExit::Failed { code: None } => "terminated by signal".to_string(),
            _ => String::new(),
        }
    }
}

/// Failure to start or observe a process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("Failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("I/O error while running command: {0}")]
    Io(String),
}

/// Executes external commands.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion, buffering stdout and stderr.
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, RunnerError>;

    /// Run to completion, sending every stdout line to `lines` as it arrives.
    ///
    /// stderr is still buffered for diagnostics and the returned stdout holds
    /// every line that was sent. The sender is dropped before this returns.
    async fn run_streaming(
        &self,
        spec: &CommandSpec,
        lines: mpsc::Sender<String>,
    ) -> Result<CommandOutput, RunnerError>;
}
