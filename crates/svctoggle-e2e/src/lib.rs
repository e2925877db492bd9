//! End-to-end harness for the service toggle controller.
//!
//! The harness drives [`svctoggle::RemoteServiceController`] against a real
//! shell instead of a remote node. It includes:
//!
//! - [`shell`]: an executor that runs command lines through a local shell
//!   with a controlled `PATH`
//! - [`node_state`]: a readiness source backed by a state file
//! - [`fixtures`]: fake hosts populated with scripted `systemctl` and
//!   `service` executables
//!
//! # Graceful Skipping
//!
//! Tests skip when `/bin/bash` is unavailable, since the fallback path relies
//! on the shell reporting a missing executable as `command not found`.

use std::path::Path;

pub mod fixtures;
pub mod node_state;
pub mod shell;

/// Checks whether the shell used by [`shell::LocalShellExecutor`] exists.
#[must_use]
pub fn bash_available() -> bool {
    Path::new(shell::DEFAULT_SHELL).is_file()
}
