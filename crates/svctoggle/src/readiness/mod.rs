//! Node readiness observation and convergence polling.
//!
//! [`ReadinessProbe`] is the blocking "wait until the node reports X" contract
//! the controller depends on. Most harnesses can only take a single snapshot
//! of a node's condition, so [`PollingProbe`] adapts any [`ReadinessSource`]
//! into a probe by observing on a fixed interval until an overall deadline.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use svctoggle_config::ToggleConfig;
use tracing::debug;

use crate::error::BoxError;
use crate::target::Target;

const READINESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::readiness");

/// Externally observed readiness of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// The node reports ready.
    Ready,
    /// The node reports anything other than ready.
    NotReady,
}

impl Readiness {
    /// Maps a boolean ready condition onto a state.
    #[must_use]
    pub const fn from_ready(ready: bool) -> Self {
        if ready { Self::Ready } else { Self::NotReady }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => formatter.write_str("Ready"),
            Self::NotReady => formatter.write_str("NotReady"),
        }
    }
}

/// Blocks until a target reaches a readiness state.
pub trait ReadinessProbe {
    /// Waits until `target` reports `expected` or `timeout` elapses.
    ///
    /// Returns whether convergence was observed.
    fn wait_for(&self, target: &Target, expected: Readiness, timeout: Duration) -> bool;
}

impl<T: ReadinessProbe + ?Sized> ReadinessProbe for &T {
    fn wait_for(&self, target: &Target, expected: Readiness, timeout: Duration) -> bool {
        (**self).wait_for(target, expected, timeout)
    }
}

/// One-shot observation of a target's readiness.
pub trait ReadinessSource {
    /// Fetches the current readiness of `target`.
    ///
    /// # Errors
    ///
    /// Returns an error when the state cannot be observed right now; pollers
    /// treat this as "not yet converged".
    fn observe(&self, target: &Target) -> Result<Readiness, BoxError>;
}

/// [`ReadinessProbe`] that polls a [`ReadinessSource`] on a fixed interval.
#[derive(Debug, Clone)]
pub struct PollingProbe<S> {
    source: S,
    interval: Duration,
}

impl<S> PollingProbe<S> {
    /// Polls `source` every `interval`.
    #[must_use]
    pub const fn new(source: S, interval: Duration) -> Self {
        Self { source, interval }
    }

    /// Polls `source` using the configured interval.
    #[must_use]
    pub const fn from_config(source: S, config: &ToggleConfig) -> Self {
        Self::new(source, config.poll_interval)
    }

    /// Borrows the wrapped source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ReadinessSource> ReadinessProbe for PollingProbe<S> {
    fn wait_for(&self, target: &Target, expected: Readiness, timeout: Duration) -> bool {
        // An unrepresentable deadline means the wait is unbounded.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            match self.source.observe(target) {
                Ok(observed) if observed == expected => return true,
                Ok(observed) => debug!(
                    target: READINESS_TARGET,
                    node = %target,
                    %expected,
                    %observed,
                    "node has not converged yet"
                ),
                Err(error) => debug!(
                    target: READINESS_TARGET,
                    node = %target,
                    %expected,
                    error = %error,
                    "failed to observe node readiness"
                ),
            }
            let pause = match deadline {
                Some(limit) => {
                    let now = Instant::now();
                    if now >= limit {
                        return false;
                    }
                    self.interval.min(limit - now)
                }
                None => self.interval,
            };
            thread::sleep(pause);
        }
    }
}
