//! Interactive terminal front end.
//!
//! Owns the terminal, feeds input and background results into the
//! [`Session`] state machine, and executes the commands it returns.

mod download;
mod draw;
mod event;
mod input;

use std::io;
use std::ops::ControlFlow;

use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::state::{Event, Session};

use self::download::Tasks;
use self::draw::draw;
use self::event::spawn_input_reader;

pub use self::input::{map_key, translate};

/// RAII guard that ensures terminal cleanup on drop.
/// Restores terminal to normal mode even if a panic occurs.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        // Construct before the remaining setup so a partial failure still restores raw mode.
        let guard = Self;
        crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            crossterm::event::EnableBracketedPaste
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(
            io::stdout(),
            crossterm::event::DisableBracketedPaste,
            LeaveAlternateScreen
        );
    }
}

/// Run the interactive downloader until the user quits.
///
/// Quitting never waits on a running download: the worker is cancelled and
/// its process killed.
///
/// # Errors
/// Returns an error if terminal setup fails or drawing encounters I/O errors.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let tool = config.tool.resolve();

    let _terminal_guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();
    let mut tasks = Tasks::new(tool, event_tx.clone(), cancel.clone());
    let _input = spawn_input_reader(event_tx, config.ui.tick_rate, cancel.child_token());

    let mut ticks = tokio::time::interval(config.ui.tick_rate);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames = tokio::time::interval(config.ui.frame_rate);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut session = Session::new(config.ui.url_char_limit);
    let size = terminal.size()?;
    session = session
        .update(Event::Resize {
            width: size.width,
            height: size.height,
        })
        .0;

    let result = loop {
        if let Err(e) = terminal.draw(|f| draw(f, &session)) {
            break Err(e);
        }

        let event = tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => event,
                None => {
                    log::warn!("Event channel closed");
                    break Ok(());
                }
            },
            Some(event) = tasks.next_relay(), if tasks.awaiting_relay() => event,
            _ = frames.tick(), if tasks.animating() => {
                tasks.frame_delivered();
                Event::Frame
            }
            _ = ticks.tick() => Event::Tick,
        };

        let (next, commands) = session.update(event);
        session = next;
        if tasks.execute(commands) == ControlFlow::Break(()) {
            break Ok(());
        }
    };

    tasks.shutdown();
    // Show cursor before exit (terminal cleanup handled by RAII guard)
    terminal.show_cursor()?;
    log::info!("Exiting");

    result
}
