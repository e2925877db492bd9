//! Shared configuration for the service toggle controller.
//!
//! [`ToggleConfig`] is the single explicit value that carries every tunable
//! the controller consults: convergence timeouts, the readiness poll interval,
//! the remote shell port, the ordered pair of service managers, the fallback
//! heuristic and the logging setup. Callers construct it (or deserialise it
//! from their harness configuration) and hand it to the controller; nothing
//! is read from process-wide state.
//!
//! Durations are serialised as integer milliseconds under `*_ms` keys so the
//! value embeds cleanly in JSON or TOML harness files.

mod defaults;
mod duration;
mod logging;
mod manager;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_FALLBACK_SIGNAL, DEFAULT_LOG_FILTER, DEFAULT_NODE_STATE_TIMEOUT,
    DEFAULT_POLL_INTERVAL, DEFAULT_SSH_PORT, default_fallback_manager, default_fallback_signal,
    default_log_filter_string, default_log_format, default_primary_manager,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use manager::{ServiceManager, ServiceManagerParseError};

/// Tunables consulted while dispatching service actions and awaiting
/// convergence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToggleConfig {
    /// Upper bound for each readiness convergence wait.
    #[serde(rename = "node_state_timeout_ms", with = "duration::millis")]
    pub node_state_timeout: Duration,
    /// Delay between readiness observations.
    #[serde(rename = "poll_interval_ms", with = "duration::millis")]
    pub poll_interval: Duration,
    /// Port joined with the resolved host to form the remote address.
    pub ssh_port: u16,
    /// Service manager attempted first.
    pub primary_manager: ServiceManager,
    /// Service manager attempted when the primary is unavailable.
    pub fallback_manager: ServiceManager,
    /// Stderr substring signalling that the primary executable is absent.
    pub fallback_signal: String,
    /// Whether a non-zero exit from the fallback command is treated as fatal.
    pub validate_fallback: bool,
    /// Whether remote commands are prefixed with `sudo`.
    pub escalate_privileges: bool,
    /// `tracing` filter expression.
    pub log_filter: String,
    /// Output format for log records.
    pub log_format: LogFormat,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            node_state_timeout: DEFAULT_NODE_STATE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            ssh_port: DEFAULT_SSH_PORT,
            primary_manager: default_primary_manager(),
            fallback_manager: default_fallback_manager(),
            fallback_signal: default_fallback_signal(),
            validate_fallback: false,
            escalate_privileges: true,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl ToggleConfig {
    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Checks that the configuration describes a usable controller.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_state_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.ssh_port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.fallback_signal.trim().is_empty() {
            return Err(ConfigError::EmptyFallbackSignal);
        }
        if self.primary_manager == self.fallback_manager {
            return Err(ConfigError::DuplicateManager {
                manager: self.primary_manager,
            });
        }
        Ok(())
    }
}

/// Reasons a [`ToggleConfig`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The convergence timeout must be positive.
    #[error("node_state_timeout_ms must be greater than zero")]
    ZeroTimeout,
    /// The poll interval must be positive.
    #[error("poll_interval_ms must be greater than zero")]
    ZeroPollInterval,
    /// Port zero cannot be connected to.
    #[error("ssh_port must be greater than zero")]
    ZeroPort,
    /// An empty signal would match every stderr stream.
    #[error("fallback_signal must not be empty")]
    EmptyFallbackSignal,
    /// Primary and fallback managers must differ.
    #[error("primary_manager and fallback_manager are both '{manager}'")]
    DuplicateManager {
        /// Manager configured for both roles.
        manager: ServiceManager,
    },
}
