//! Local shell standing in for the remote host.
//!
//! [`LocalShellExecutor`] runs each command line through `bash -c` with a
//! restricted `PATH`, so the presence or absence of a service manager is
//! decided by which scripts the fixture placed on that path. The address is
//! only logged; every command runs locally.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use svctoggle::{BoxError, CommandResult, RemoteAddress, RemoteExecutor};
use thiserror::Error;
use tracing::debug;

/// Shell used to interpret command lines.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Exit code reported when the shell was terminated by a signal.
const SIGNALLED_EXIT: i32 = -1;

/// Failures raised before the command could run.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The shell binary could not be spawned.
    #[error("failed to spawn shell '{shell}': {source}")]
    Spawn {
        /// Shell that failed to start.
        shell: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Executes commands through a local shell with a controlled `PATH`.
#[derive(Debug, Clone)]
pub struct LocalShellExecutor {
    shell: PathBuf,
    search_path: OsString,
}

impl LocalShellExecutor {
    /// Runs commands with `bin_dir` as the only `PATH` entry.
    #[must_use]
    pub fn new(bin_dir: &Path) -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            search_path: bin_dir.as_os_str().to_owned(),
        }
    }

    /// Overrides the interpreting shell.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl RemoteExecutor for LocalShellExecutor {
    fn execute(&self, command: &str, address: &RemoteAddress) -> Result<CommandResult, BoxError> {
        debug!(%address, command, "running command in local shell");
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .env_clear()
            .env("PATH", &self.search_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ShellError::Spawn {
                shell: self.shell.clone(),
                source,
            })?;
        Ok(CommandResult::new(
            output.status.code().unwrap_or(SIGNALLED_EXIT),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}
