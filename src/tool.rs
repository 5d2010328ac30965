//! Locating and invoking the external retrieval tool.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::error::{Error, Result};
use crate::mode::DownloadMode;
use crate::progress::PROGRESS_TEMPLATE;

/// A resolved external retrieval tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    program: PathBuf,
}

impl Tool {
    /// Wraps an explicit program path.
    #[must_use]
    pub const fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Locates `name` next to the running executable, then in the current
    /// directory, falling back to the bare name for a `PATH` lookup.
    #[must_use]
    pub fn locate(name: &str) -> Self {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let cwd = env::current_dir().ok();
        let tool = Self::locate_in(name, exe_dir.as_deref(), cwd.as_deref());
        log::info!("Using external tool {}", tool.program.display());
        tool
    }

    /// Search order with explicit directories.
    #[must_use]
    pub fn locate_in(name: &str, exe_dir: Option<&Path>, cwd: Option<&Path>) -> Self {
        let file_name = format!("{name}{}", env::consts::EXE_SUFFIX);
        let program = exe_dir
            .into_iter()
            .chain(cwd)
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| PathBuf::from(name));
        Self { program }
    }

    /// Path or bare name that will be executed.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Invocation that dumps the metadata of `reference` as JSON.
    #[must_use]
    pub fn metadata_command(&self, reference: &str) -> ToolCommand {
        ToolCommand::new(
            self.program.clone(),
            ["--dump-json", "--no-playlist", "--", reference],
        )
    }

    /// Invocation that downloads `reference` in `mode`, printing one
    /// pipe-delimited progress line per update.
    #[must_use]
    pub fn download_command(&self, mode: DownloadMode, reference: &str) -> ToolCommand {
        let mut args = vec!["--newline", "--progress-template", PROGRESS_TEMPLATE];
        args.extend_from_slice(mode.args());
        // `--` keeps a reference starting with '-' from being read as an option.
        args.extend(["--no-playlist", "--", reference]);
        ToolCommand::new(self.program.clone(), args)
    }
}

/// A program plus its argument vector, ready to be spawned with piped output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Creates a command from a program and its arguments.
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Program that will be executed.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Builds the process with stdin closed, stdout and stderr piped, and the
    /// child killed when its handle is dropped.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Spawns the process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolNotFound`] when the program is missing or not
    /// executable, [`Error::WorkerStart`] for any other spawn failure.
    pub fn spawn(&self) -> Result<Child> {
        log::info!("Spawning {} {:?}", self.program.display(), self.args);
        self.command().spawn().map_err(|e| self.spawn_error(e))
    }

    /// Classifies an error returned while starting this command.
    #[must_use]
    pub fn spawn_error(&self, source: io::Error) -> Error {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => Error::ToolNotFound {
                program: self.program.display().to_string(),
                source,
            },
            _ => Error::WorkerStart(source),
        }
    }
}
