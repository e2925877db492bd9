//! Error surface of [`apply_action`](crate::RemoteServiceController::apply_action).
//!
//! Every variant is terminal for the call that produced it. Nothing is rolled
//! back: a failed convergence wait after a successful stop leaves the service
//! stopped, and the caller decides whether to retry the whole operation.

use std::error::Error as StdError;
use std::time::Duration;

use svctoggle_config::ConfigError;
use thiserror::Error;

use crate::action::ServiceAction;
use crate::command::{CommandResult, Mechanism};
use crate::readiness::Readiness;

/// Error type returned by collaborator implementations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failures raised while applying a service action.
#[derive(Debug, Error)]
pub enum ToggleError {
    /// The target could not be mapped to a connectable address.
    #[error("failed to resolve an address for node '{node}': {source}")]
    Resolution {
        /// Node being resolved.
        node: String,
        /// Resolver failure.
        #[source]
        source: BoxError,
    },
    /// The remote execution channel could not be established.
    #[error("remote execution of `{command}` on node '{node}' ({address}) failed: {source}")]
    Transport {
        /// Node the command was sent to.
        node: String,
        /// Rendered address.
        address: String,
        /// Command line that was being executed.
        command: String,
        /// Which manager the command belonged to.
        mechanism: Mechanism,
        /// Executor failure.
        #[source]
        source: BoxError,
    },
    /// The remote command ran and exited non-zero.
    #[error(
        "failed to {action} service via {mechanism} command `{command}` (exit {code}): {stderr}",
        code = .result.code,
        stderr = .result.stderr.trim_end()
    )]
    Command {
        /// Requested action.
        action: ServiceAction,
        /// Which manager produced the failure.
        mechanism: Mechanism,
        /// Command line that failed.
        command: String,
        /// Full captured output for diagnostics.
        result: Box<CommandResult>,
    },
    /// The node did not reach the expected readiness in time.
    #[error("node '{node}' failed to enter {expected} state within {timeout_ms} ms after {action}")]
    Convergence {
        /// Requested action.
        action: ServiceAction,
        /// Node being observed.
        node: String,
        /// State that was not observed.
        expected: Readiness,
        /// Wait bound in milliseconds.
        timeout_ms: u64,
    },
}

impl ToggleError {
    /// Readiness state a convergence failure was waiting for.
    #[must_use]
    pub const fn expected_state(&self) -> Option<Readiness> {
        match self {
            Self::Convergence { expected, .. } => Some(*expected),
            _ => None,
        }
    }
}

/// Errors raised while constructing a controller.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The supplied configuration is unusable.
    #[error("invalid controller configuration: {0}")]
    Config(#[from] ConfigError),
}

pub(crate) fn duration_millis(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}
