//! Command execution: background metadata fetches, the download worker and
//! the single live progress relay.

use std::ops::ControlFlow;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::download::WorkerSupervisor;
use crate::metadata::{failure_reason, fetch_metadata};
use crate::mode::DownloadMode;
use crate::relay::{RelayReceiver, relay};
use crate::state::{Command, Event};
use crate::tool::Tool;

/// Runs the side effects requested by session transitions.
#[derive(Debug)]
pub struct Tasks {
    tool: Tool,
    events: UnboundedSender<Event>,
    relay: Option<RelayReceiver>,
    awaiting: bool,
    animating: bool,
    cancel: CancellationToken,
}

impl Tasks {
    #[must_use]
    pub const fn new(tool: Tool, events: UnboundedSender<Event>, cancel: CancellationToken) -> Self {
        Self {
            tool,
            events,
            relay: None,
            awaiting: false,
            animating: false,
            cancel,
        }
    }

    /// Executes commands in order, breaking on [`Command::Quit`].
    pub fn execute(&mut self, commands: Vec<Command>) -> ControlFlow<()> {
        for command in commands {
            match command {
                Command::Quit => return ControlFlow::Break(()),
                Command::FetchMetadata(reference) => self.fetch_metadata(reference),
                Command::StartDownload { reference, mode } => self.start_download(&reference, mode),
                Command::AwaitRelay => self.awaiting = self.relay.is_some(),
                Command::AnimateProgress => self.animating = true,
            }
        }
        ControlFlow::Continue(())
    }

    fn fetch_metadata(&self, reference: String) {
        let command = self.tool.metadata_command(&reference);
        let events = self.events.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let event = tokio::select! {
                () = cancel.cancelled() => return,
                result = fetch_metadata(&command, &reference) => match result {
                    Ok(metadata) => Event::MetadataReady(metadata),
                    Err(e) => {
                        let reason = failure_reason(&e);
                        log::error!("{reason}");
                        Event::MetadataFailed(reason)
                    }
                },
            };
            let _ = events.send(event);
        });
    }

    fn start_download(&mut self, reference: &str, mode: DownloadMode) {
        if self.relay.is_some() {
            log::warn!("Download already running, ignoring start for {reference}");
            return;
        }
        log::info!("Starting {} download of {reference}", mode.label());

        let (tx, rx) = relay();
        self.relay = Some(rx);
        let command = self.tool.download_command(mode, reference);
        WorkerSupervisor::new(command).spawn(tx, self.cancel.child_token());
    }

    /// Whether a relay wait is armed.
    #[must_use]
    pub const fn awaiting_relay(&self) -> bool {
        self.awaiting
    }

    /// Whether the progress bar wants another frame.
    #[must_use]
    pub const fn animating(&self) -> bool {
        self.animating
    }

    /// Consumes the pending frame request.
    pub const fn frame_delivered(&mut self) {
        self.animating = false;
    }

    /// Waits for the next relay event and disarms the wait.
    ///
    /// Returns `None` when no relay is live. A terminal event releases the
    /// relay so a later download can start.
    pub async fn next_relay(&mut self) -> Option<Event> {
        let event = self.relay.as_mut()?.next().await;
        self.awaiting = false;
        if event.is_terminal() {
            self.relay = None;
        }
        Some(event.into())
    }

    /// Stops every background task and worker process.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
