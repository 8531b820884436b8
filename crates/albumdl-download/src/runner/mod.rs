//! Process-backed command runner.
//!
//! Spawns exactly one child per call with piped stdout/stderr. stdout is
//! read line by line (and optionally forwarded to a channel), stderr is
//! drained by a helper task. The child's exit is awaited alongside the
//! stdout reader, so a grandchild that inherits the pipes cannot hold the
//! run open; leftover output is drained for a short grace after exit.
//! The whole run is bounded by the command's timeout; a child that
//! overruns is killed and reaped before returning.

mod stream;

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use albumdl_core::ports::{CommandExit, CommandOutput, CommandRunner, CommandSpec, RunnerError};

use self::stream::LossyLines;

/// How long pipes may stay open once the child is gone.
///
/// Grandchildren that inherited stdout/stderr can keep them open
/// indefinitely; their output after this grace is dropped.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, RunnerError> {
        execute(spec, None).await
    }

    async fn run_streaming(
        &self,
        spec: &CommandSpec,
        lines: mpsc::Sender<String>,
    ) -> Result<CommandOutput, RunnerError> {
        execute(spec, Some(lines)).await
    }
}

async fn execute(
    spec: &CommandSpec,
    lines: Option<mpsc::Sender<String>>,
) -> Result<CommandOutput, RunnerError> {
    debug!(
        target: "albumdl.process",
        command = %spec,
        cwd = ?spec.working_dir,
        timeout_secs = spec.timeout.as_secs(),
        "Spawning command"
    );

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|e| RunnerError::Spawn {
        program: spec.program.clone(),
        reason: e.to_string(),
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RunnerError::Io("missing stdout pipe".to_string()))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| RunnerError::Io("missing stderr pipe".to_string()))?;

    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf).await;
        buf
    });

    let mut reader = LossyLines::new(stdout);
    let mut sink = LineSink::new(lines);
    let mut stdout_open = true;
    let deadline = Instant::now() + spec.timeout;

    // The exit status is observed independently of stdout EOF.
    let status = loop {
        tokio::select! {
            read = reader.next_line(), if stdout_open => match read {
                Ok(Some(line)) => {
                    // A stalled consumer counts against the same deadline.
                    if tokio::time::timeout_at(deadline, sink.push(line)).await.is_err() {
                        break None;
                    }
                }
                Ok(None) => stdout_open = false,
                Err(e) => {
                    let _ = child.kill().await;
                    stderr_task.abort();
                    return Err(RunnerError::Io(e.to_string()));
                }
            },
            waited = child.wait() => {
                break Some(waited.map_err(|e| RunnerError::Io(e.to_string()))?);
            }
            () = tokio::time::sleep_until(deadline) => break None,
        }
    };

    let exit = match status {
        Some(status) => exit_from_status(status),
        None => {
            warn!(
                target: "albumdl.process",
                command = %spec,
                timeout_secs = spec.timeout.as_secs(),
                "Command timed out, killing"
            );
            if let Err(e) = child.kill().await {
                warn!(target: "albumdl.process", error = %e, "Failed to kill timed out command");
            }
            CommandExit::TimedOut {
                after: spec.timeout,
            }
        }
    };

    let drain_deadline = Instant::now() + PIPE_DRAIN_GRACE;
    if stdout_open {
        let drained = tokio::time::timeout_at(drain_deadline, async {
            while let Ok(Some(line)) = reader.next_line().await {
                sink.push(line).await;
            }
        })
        .await;
        if drained.is_err() {
            debug!(target: "albumdl.process", "stdout still open after exit, giving up on it");
        }
    }
    let stdout = sink.finish();
    let stderr = drain_stderr(stderr_task, drain_deadline).await;
    let stderr = String::from_utf8_lossy(&stderr).into_owned();

    info!(
        target: "albumdl.process",
        program = %spec.program,
        exit = ?exit,
        "Command finished"
    );

    Ok(CommandOutput {
        exit,
        stdout,
        stderr,
    })
}

/// Collects stdout and forwards each line to an optional consumer.
struct LineSink {
    captured: String,
    lines: Option<mpsc::Sender<String>>,
}

impl LineSink {
    const fn new(lines: Option<mpsc::Sender<String>>) -> Self {
        Self {
            captured: String::new(),
            lines,
        }
    }

    async fn push(&mut self, line: String) {
        self.captured.push_str(&line);
        self.captured.push('\n');

        if let Some(tx) = &self.lines {
            // A vanished consumer must not stall the child; keep draining.
            if tx.send(line).await.is_err() {
                debug!(target: "albumdl.process", "Line consumer closed, draining only");
                self.lines = None;
            }
        }
    }

    /// Captured stdout. Dropping the sender here closes the consumer's channel.
    fn finish(self) -> String {
        self.captured
    }
}

fn exit_from_status(status: ExitStatus) -> CommandExit {
    if status.success() {
        CommandExit::Success
    } else {
        CommandExit::Failed {
            code: status.code(),
        }
    }
}

async fn drain_stderr(mut task: JoinHandle<Vec<u8>>, deadline: Instant) -> Vec<u8> {
    match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(Ok(buf)) => buf,
        Ok(Err(_)) => Vec::new(),
        Err(_) => {
            task.abort();
            debug!(target: "albumdl.process", "stderr still open after exit, giving up on it");
            Vec::new()
        }
    }
}
