//! grab-dl - An interactive terminal front end for downloading online media
//! through `yt-dlp`.
//!
//! The library holds the orchestration core, independent of any terminal:
//! a pure screen state machine, the metadata fetcher, the download worker
//! supervisor, the progress line parser and the relay that carries progress
//! from the worker to the UI. The `tui` feature adds the ratatui front end.
//!
//! # Example
//!
//! ```no_run
//! use grab_dl::{DownloadMode, RelayEvent, Tool, WorkerSupervisor, relay};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let tool = Tool::locate("yt-dlp");
//! let command = tool.download_command(DownloadMode::Hd720, "https://youtu.be/abc");
//!
//! let (tx, mut rx) = relay();
//! WorkerSupervisor::new(command).spawn(tx, CancellationToken::new());
//!
//! loop {
//!     match rx.next().await {
//!         RelayEvent::Progress(fraction) => println!("{:.0}%", fraction * 100.0),
//!         RelayEvent::Stats(stats) => println!("ETA {}", stats.eta),
//!         RelayEvent::Outcome(outcome) => {
//!             println!("{outcome:?}");
//!             break;
//!         }
//!     }
//! }
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod input;
pub mod metadata;
pub mod mode;
pub mod progress;
pub mod relay;
pub mod state;
pub mod tool;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{AppConfig, ToolConfig, UiConfig};
pub use download::WorkerSupervisor;
pub use error::{Error, Result};
pub use format::format_duration;
pub use input::TextInput;
pub use metadata::{MediaMetadata, fetch_metadata};
pub use mode::{DownloadMode, MenuAction};
pub use progress::{DownloadStats, ParsedLine, parse_progress_line};
pub use relay::{Outcome, RelayEvent, RelayReceiver, RelaySender, relay};
pub use state::{Command, Event, Key, Screen, Session};
pub use tool::{Tool, ToolCommand};
