//! Collaborator traits for reaching the remote host.
//!
//! The crate ships no transport: harnesses plug in their own SSH client and
//! node lookup by implementing these traits.

use crate::command::CommandResult;
use crate::error::BoxError;
use crate::target::{RemoteAddress, Target};

/// Maps a logical target onto a reachable host.
pub trait AddressResolver {
    /// Returns the host name or IP literal for `target`, without a port.
    ///
    /// # Errors
    ///
    /// Returns an error when no address can be obtained for the target.
    fn resolve(&self, target: &Target) -> Result<String, BoxError>;
}

/// Runs a shell command on a remote host.
pub trait RemoteExecutor {
    /// Executes `command` on `address` and captures its output.
    ///
    /// A command that runs and exits non-zero is a successful call; only a
    /// failure to establish the channel is an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote execution channel cannot be
    /// established.
    fn execute(&self, command: &str, address: &RemoteAddress) -> Result<CommandResult, BoxError>;
}

impl<T: AddressResolver + ?Sized> AddressResolver for &T {
    fn resolve(&self, target: &Target) -> Result<String, BoxError> {
        (**self).resolve(target)
    }
}

impl<T: RemoteExecutor + ?Sized> RemoteExecutor for &T {
    fn execute(&self, command: &str, address: &RemoteAddress) -> Result<CommandResult, BoxError> {
        (**self).execute(command, address)
    }
}
