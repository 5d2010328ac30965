//! Configuration types for the interactive session and the external tool.

use std::path::PathBuf;
use std::time::Duration;

use crate::tool::Tool;

/// Environment variable naming an explicit path to the external tool.
pub const TOOL_PATH_ENV: &str = "GRAB_YT_DLP";

/// Environment variable naming a file that receives log output.
pub const LOG_FILE_ENV: &str = "GRAB_LOG";

/// How the external retrieval tool is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Executable name used by the search order.
    pub name: String,
    /// Explicit path that bypasses the search order.
    pub path: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: "yt-dlp".to_string(),
            path: None,
        }
    }
}

impl ToolConfig {
    /// Resolves the configured tool to a runnable program.
    #[must_use]
    pub fn resolve(&self) -> Tool {
        self.path
            .as_ref()
            .map_or_else(|| Tool::locate(&self.name), |path| Tool::new(path.clone()))
    }
}

/// Timing and input limits for the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    /// Interval between spinner ticks.
    pub tick_rate: Duration,
    /// Interval between progress bar animation frames.
    pub frame_rate: Duration,
    /// Maximum number of characters accepted by the URL input.
    pub url_char_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
            frame_rate: Duration::from_millis(16),
            url_char_limit: 160,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// External tool configuration.
    pub tool: ToolConfig,
    /// Front end configuration.
    pub ui: UiConfig,
    /// File that receives log output; logging is disabled when `None`.
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from defaults overridden by the process environment.
    #[must_use]
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(path) = non_empty(TOOL_PATH_ENV) {
            config = config.with_tool_path(path);
        }
        if let Some(path) = non_empty(LOG_FILE_ENV) {
            config = config.with_log_file(path);
        }
        config
    }

    /// Sets an explicit path to the external tool.
    #[must_use]
    pub fn with_tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool.path = Some(path.into());
        self
    }

    /// Sets the file that receives log output.
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Sets the URL input character limit.
    #[must_use]
    pub const fn with_url_char_limit(mut self, limit: usize) -> Self {
        self.ui.url_char_limit = limit;
        self
    }
}
