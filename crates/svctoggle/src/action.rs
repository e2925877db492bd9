//! Lifecycle actions applied to a remote service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::readiness::Readiness;

/// Lifecycle action requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceAction {
    /// Start the service and wait for the node to report ready.
    Start,
    /// Stop the service and wait for the node to report not ready.
    Stop,
    /// Restart the service, waiting for not ready and then ready.
    Restart,
}

impl ServiceAction {
    /// Verb passed to the service manager.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }

    /// Readiness states the node must pass through, in order, once the
    /// command has been dispatched.
    ///
    /// A restart drops out of `Ready` only briefly, so waiting for
    /// `NotReady` first keeps the `Ready` wait from observing the
    /// pre-restart state.
    #[must_use]
    pub const fn convergence_plan(self) -> &'static [Readiness] {
        match self {
            Self::Start => &[Readiness::Ready],
            Self::Stop => &[Readiness::NotReady],
            Self::Restart => &[Readiness::NotReady, Readiness::Ready],
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
