//! Error types for the grab-dl library.

use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while resolving metadata or supervising a download.
#[derive(Error, Debug)]
pub enum Error {
    /// The external tool could not be found or is not executable.
    #[error("{program} not found or not runnable: {source}")]
    ToolNotFound {
        /// Program that was invoked.
        program: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The external tool exited unsuccessfully.
    #[error("{status}{detail}")]
    NonZeroExit {
        /// Exit status reported by the operating system.
        status: ExitStatus,
        /// Last diagnostic line from stderr, prefixed with `": "`, or empty.
        detail: String,
    },

    /// The metadata dump could not be decoded.
    #[error("{0}")]
    MalformedMetadata(#[from] serde_json::Error),

    /// The worker process could not be started.
    #[error("could not start worker: {0}")]
    WorkerStart(std::io::Error),

    /// A piped output stream of the worker was unavailable.
    #[error("worker {0} unavailable")]
    StreamOpen(&'static str),

    /// I/O error while reading worker output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The relay consumer went away before the worker finished.
    #[error("progress relay closed")]
    RelayClosed,

    /// The operation was cancelled by a force-quit.
    #[error("cancelled")]
    Cancelled,
}

impl Error {
    /// Builds a [`Error::NonZeroExit`] from an exit status and captured stderr.
    #[must_use]
    pub fn non_zero_exit(status: ExitStatus, stderr: Option<&str>) -> Self {
        let detail = stderr
            .and_then(last_diagnostic_line)
            .map(|line| format!(": {line}"))
            .unwrap_or_default();
        Self::NonZeroExit { status, detail }
    }
}

/// Returns the last non-empty line of a stderr capture.
#[must_use]
pub fn last_diagnostic_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).rfind(|line| !line.is_empty())
}

/// A specialized `Result` type for grab-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
