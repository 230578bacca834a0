//! External analyzer invocation
//!
//! Spawns the analyzer directly (no shell), drains stdout and stderr while
//! waiting for it to exit, and classifies the result. Cancellation and the
//! optional deadline abort the wait; the child is then killed and reaped.

use crate::command::CommandSpec;
use crate::error::CommandError;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// How one analyzer invocation ended
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Exit code 0 with non-blank stdout
    Success { stdout: String },
    /// Exit code other than 0; `-1` when the process was killed by a signal
    NonZeroExit { code: i32, stderr: String },
    /// Exit code 0 but stdout was blank; stderr is kept for diagnostics
    EmptyOutput { stderr: String },
    /// The process could not be started or observed
    SpawnFailure { cause: io::Error },
    Cancelled,
    TimedOut { after: Duration },
}

enum Wait {
    Finished(io::Result<(ExitStatus, Vec<u8>, Vec<u8>)>),
    Cancelled,
    TimedOut(Duration),
}

/// Run the analyzer described by `spec`
pub async fn run(
    spec: &CommandSpec,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> ProcessOutcome {
    if cancel.is_cancelled() {
        return ProcessOutcome::Cancelled;
    }

    let mut command = Command::new(&spec.executable);
    command
        .args(spec.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    log::debug!("Spawning analyzer: {}", spec);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(cause) => return ProcessOutcome::SpawnFailure { cause },
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let deadline = async {
        match timeout {
            Some(after) => tokio::time::sleep(after).await,
            None => std::future::pending::<()>().await,
        }
    };

    let wait = tokio::select! {
        biased;
        _ = cancel.cancelled() => Wait::Cancelled,
        _ = deadline => Wait::TimedOut(timeout.unwrap_or_default()),
        result = collect(&mut child, stdout, stderr) => Wait::Finished(result),
    };

    match wait {
        Wait::Finished(Ok((status, stdout, stderr))) => classify(status, &stdout, &stderr),
        Wait::Finished(Err(cause)) => {
            reap(&mut child).await;
            ProcessOutcome::SpawnFailure { cause }
        }
        Wait::Cancelled => {
            log::debug!("Analyzer cancelled: {}", spec);
            reap(&mut child).await;
            ProcessOutcome::Cancelled
        }
        Wait::TimedOut(after) => {
            log::debug!("Analyzer timed out after {:?}: {}", after, spec);
            reap(&mut child).await;
            ProcessOutcome::TimedOut { after }
        }
    }
}

/// Build the invocation from a configured command line and run it.
///
/// Returns `Ok(None)` without spawning when the command line is blank.
pub async fn run_command_line(
    command_line: &str,
    target_path: &str,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<Option<ProcessOutcome>, CommandError> {
    match CommandSpec::from_template(command_line, target_path)? {
        Some(spec) => Ok(Some(run(&spec, cancel, timeout).await)),
        None => Ok(None),
    }
}

/// Drain both pipes and wait for exit, all concurrently
async fn collect(
    child: &mut Child,
    stdout: Option<impl AsyncRead + Unpin>,
    stderr: Option<impl AsyncRead + Unpin>,
) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let (stdout, stderr, status) =
        tokio::join!(read_pipe(stdout), read_pipe(stderr), child.wait());
    Ok((status?, stdout?, stderr?))
}

async fn read_pipe(pipe: Option<impl AsyncRead + Unpin>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kill the child and wait for it so no zombie is left behind
async fn reap(child: &mut Child) {
    if let Err(e) = child.kill().await {
        log::debug!("Failed to kill analyzer process: {}", e);
    }
}

fn classify(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> ProcessOutcome {
    if !status.success() {
        return ProcessOutcome::NonZeroExit {
            code: status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        };
    }

    let stdout = String::from_utf8_lossy(stdout);
    if stdout.trim().is_empty() {
        ProcessOutcome::EmptyOutput {
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    } else {
        ProcessOutcome::Success {
            stdout: stdout.into_owned(),
        }
    }
}
