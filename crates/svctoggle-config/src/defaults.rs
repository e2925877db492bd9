use std::time::Duration;

use crate::logging::LogFormat;
use crate::manager::ServiceManager;

/// How long a node may take to reach the expected readiness state.
pub const DEFAULT_NODE_STATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Delay between readiness observations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Port appended to resolved host addresses.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Stderr fragment reported by shells when an executable is absent.
pub const DEFAULT_FALLBACK_SIGNAL: &str = "command not found";

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Service manager tried first.
pub const fn default_primary_manager() -> ServiceManager {
    ServiceManager::Systemctl
}

/// Service manager tried when the primary is missing on the host.
pub const fn default_fallback_manager() -> ServiceManager {
    ServiceManager::Service
}

/// Owned fallback signal used where allocation is required (e.g. serde).
pub fn default_fallback_signal() -> String {
    DEFAULT_FALLBACK_SIGNAL.to_owned()
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
