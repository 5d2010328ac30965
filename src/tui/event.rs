//! Terminal input pump.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::input::translate;
use crate::state::Event;

/// Reads terminal events on a dedicated thread and forwards them as session
/// events until `stop` is cancelled or the receiver goes away.
pub fn spawn_input_reader(
    tx: UnboundedSender<Event>,
    poll_interval: Duration,
    stop: CancellationToken,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.is_cancelled() {
            match crossterm::event::poll(poll_interval) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    log::error!("Terminal poll failed: {e}");
                    break;
                }
            }
            let event = match crossterm::event::read() {
                Ok(event) => event,
                Err(e) => {
                    log::error!("Terminal read failed: {e}");
                    break;
                }
            };
            if let Some(event) = translate(event)
                && tx.send(event).is_err()
            {
                break;
            }
        }
        log::debug!("Input reader stopped");
    })
}
