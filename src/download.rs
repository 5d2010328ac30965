//! Supervision of the external download process.
//!
//! A [`WorkerSupervisor`] owns one child process for the lifetime of one
//! download. Standard output is decoded line by line into progress samples
//! and stats that are handed to the UI through a [`RelaySender`]; standard
//! error is drained concurrently, logged, and its last line kept as failure
//! detail.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result, last_diagnostic_line};
use crate::progress::{DownloadStats, parse_progress_line};
use crate::relay::RelaySender;
use crate::tool::ToolCommand;

/// Lifecycle owner of one external download process.
#[derive(Debug, Clone)]
pub struct WorkerSupervisor {
    command: ToolCommand,
}

impl WorkerSupervisor {
    /// Creates a supervisor for the given invocation.
    #[must_use]
    pub const fn new(command: ToolCommand) -> Self {
        Self { command }
    }

    /// Runs the supervisor as an independent task.
    pub fn spawn(self, relay: RelaySender, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(relay, cancel))
    }

    /// Drives the process to completion and reports the terminal outcome.
    ///
    /// Success closes the relay; any failure is sent on its error channel.
    /// Cancellation and a vanished consumer end silently, killing the child.
    pub async fn run(self, relay: RelaySender, cancel: CancellationToken) {
        match self.supervise(&relay, &cancel).await {
            Ok(()) => {
                log::info!("Download finished");
                relay.complete();
            }
            Err(Error::Cancelled) => log::info!("Download cancelled"),
            Err(Error::RelayClosed) => log::warn!("Progress consumer went away, worker stopped"),
            Err(e) => {
                let reason = format!("download failed: {e}");
                log::error!("{reason}");
                relay.fail(reason).await;
            }
        }
    }

    async fn supervise(&self, relay: &RelaySender, cancel: &CancellationToken) -> Result<()> {
        let mut child = self.command.spawn()?;
        let stdout = child.stdout.take().ok_or(Error::StreamOpen("stdout"))?;
        let stderr = child.stderr.take().ok_or(Error::StreamOpen("stderr"))?;

        let stderr_task = tokio::spawn(drain_stderr(stderr));
        let mut stdout = BufReader::new(stdout);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = tokio::select! {
                () = cancel.cancelled() => return abort(&mut child).await,
                read = stdout.read_until(b'\n', &mut buf) => read?,
            };
            if read == 0 {
                break;
            }

            // Filenames in tool output need not be UTF-8.
            let line = String::from_utf8_lossy(&buf);
            let parsed = parse_progress_line(&line);
            if parsed.is_empty() {
                log::debug!("worker: {}", line.trim_end());
                continue;
            }

            tokio::select! {
                () = cancel.cancelled() => return abort(&mut child).await,
                sent = forward(relay, parsed.fraction, parsed.stats) => sent?,
            }
        }

        let status = tokio::select! {
            () = cancel.cancelled() => return abort(&mut child).await,
            status = child.wait() => status?,
        };
        let last_stderr = stderr_task.await.ok().flatten();

        if status.success() {
            Ok(())
        } else {
            log::warn!("Worker exited with {status}");
            Err(Error::non_zero_exit(status, last_stderr.as_deref()))
        }
    }
}

async fn forward(
    relay: &RelaySender,
    fraction: Option<f64>,
    stats: Option<DownloadStats>,
) -> Result<()> {
    if let Some(fraction) = fraction {
        relay.send_progress(fraction).await?;
    }
    if let Some(stats) = stats {
        relay.send_stats(stats).await?;
    }
    Ok(())
}

async fn abort(child: &mut Child) -> Result<()> {
    if let Err(e) = child.kill().await {
        log::warn!("Failed to kill worker: {e}");
    }
    Err(Error::Cancelled)
}

/// Consecutive read failures after which the stderr drain gives up.
const MAX_STDERR_READ_ERRORS: usize = 8;

/// Reads stderr to the end so the pipe never fills, returning its last line.
///
/// Lines are decoded lossily and read errors are skipped, so the read end
/// stays open until the worker closes it.
async fn drain_stderr<R>(stderr: R) -> Option<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    let mut last = None;
    let mut errors = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                errors = 0;
                let line = String::from_utf8_lossy(&buf);
                log::debug!("worker stderr: {}", line.trim_end());
                if let Some(trimmed) = last_diagnostic_line(&line) {
                    last = Some(trimmed.to_string());
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                errors += 1;
                log::warn!("Failed to read worker stderr: {e}");
                if errors >= MAX_STDERR_READ_ERRORS {
                    break;
                }
            }
        }
    }
    last
}
