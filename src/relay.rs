//! Single-slot channels carrying worker events to the UI loop.
//!
//! A relay bundles three channels of capacity one: percent, stats and
//! error. Every send is a handoff: it returns only once the consumer has
//! taken the item, so at most one event is in flight and events arrive in
//! the order they were sent. The consumer issues one [`RelayReceiver::next`]
//! at a time. Completion is signalled by the producer dropping its
//! [`RelaySender`], which closes every channel.

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::progress::DownloadStats;

/// Final result of a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed(String),
}

/// One event delivered by the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    Progress(f64),
    Stats(DownloadStats),
    Outcome(Outcome),
}

impl RelayEvent {
    /// Returns true for events after which no further waits are issued.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Outcome(_))
    }
}

/// Creates a connected relay pair.
#[must_use]
pub fn relay() -> (RelaySender, RelayReceiver) {
    let (percent_tx, percent_rx) = mpsc::channel(1);
    let (stats_tx, stats_rx) = mpsc::channel(1);
    let (error_tx, error_rx) = mpsc::channel(1);
    (
        RelaySender {
            percent: percent_tx,
            stats: stats_tx,
            error: error_tx,
        },
        RelayReceiver {
            percent: percent_rx,
            stats: stats_rx,
            error: error_rx,
        },
    )
}

/// Producer half, owned by the worker supervisor.
#[derive(Debug)]
pub struct RelaySender {
    percent: mpsc::Sender<f64>,
    stats: mpsc::Sender<DownloadStats>,
    error: mpsc::Sender<String>,
}

impl RelaySender {
    /// Hands off a completion fraction, waiting until the consumer takes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelayClosed`] if the receiver was dropped.
    pub async fn send_progress(&self, fraction: f64) -> Result<()> {
        handoff(&self.percent, fraction).await
    }

    /// Hands off a stats update, waiting until the consumer takes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RelayClosed`] if the receiver was dropped.
    pub async fn send_stats(&self, stats: DownloadStats) -> Result<()> {
        handoff(&self.stats, stats).await
    }

    /// Reports a failure and closes the relay.
    ///
    /// The error is handed off before the percent channel closes, so the
    /// receiver never mistakes a failure for completion.
    pub async fn fail(self, reason: String) {
        if self.error.send(reason).await.is_err() {
            log::debug!("Relay receiver gone before failure could be reported");
        }
    }

    /// Closes the relay, signalling successful completion.
    pub fn complete(self) {
        drop(self);
    }
}

/// Sends `item` and waits for its slot to free up again.
async fn handoff<T>(sender: &mpsc::Sender<T>, item: T) -> Result<()> {
    sender.send(item).await.map_err(|_| Error::RelayClosed)?;
    // The single slot only frees once the receiver has taken the item.
    sender
        .reserve()
        .await
        .map(drop)
        .map_err(|_| Error::RelayClosed)
}

/// Consumer half, owned by the UI loop.
#[derive(Debug)]
pub struct RelayReceiver {
    percent: mpsc::Receiver<f64>,
    stats: mpsc::Receiver<DownloadStats>,
    error: mpsc::Receiver<String>,
}

impl RelayReceiver {
    /// Waits for whichever channel produces first.
    ///
    /// A pending error wins over everything else. [`Outcome::Completed`] is
    /// only reported once every channel is closed and drained. Once a
    /// terminal event has been returned the caller must stop waiting.
    ///
    /// Cancel safe: dropping the future never loses an event.
    pub async fn next(&mut self) -> RelayEvent {
        tokio::select! {
            biased;
            Some(reason) = self.error.recv() => RelayEvent::Outcome(Outcome::Failed(reason)),
            Some(fraction) = self.percent.recv() => RelayEvent::Progress(fraction),
            Some(stats) = self.stats.recv() => RelayEvent::Stats(stats),
            else => RelayEvent::Outcome(Outcome::Completed),
        }
    }
}
