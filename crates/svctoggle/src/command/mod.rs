//! Remote command construction and result inspection.
//!
//! The controller never builds shell text itself: [`render_command`] turns an
//! action, a service and a [`ServiceManager`] into the command line, and
//! [`FallbackSignal`] decides whether a primary result means the manager's
//! executable is missing on the host. Keeping the string heuristic behind
//! that predicate lets it be replaced without touching dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};
use svctoggle_config::{ServiceManager, ToggleConfig};

use crate::action::ServiceAction;
use crate::target::ServiceName;

/// Output captured from a remote command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandResult {
    /// Exit status reported by the remote shell.
    pub code: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandResult {
    /// Builds a result from its parts.
    #[must_use]
    pub fn new(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.code == 0
    }
}

/// Which of the two service-management styles produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mechanism {
    /// First-choice manager.
    Primary,
    /// Manager used after the primary was reported missing.
    Secondary,
}

impl Mechanism {
    /// Manager configured for this role.
    #[must_use]
    pub const fn manager(self, config: &ToggleConfig) -> ServiceManager {
        match self {
            Self::Primary => config.primary_manager,
            Self::Secondary => config.fallback_manager,
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => formatter.write_str("primary"),
            Self::Secondary => formatter.write_str("secondary"),
        }
    }
}

/// Renders the shell command applying `action` to `service` via `manager`.
#[must_use]
pub fn render_command(
    manager: ServiceManager,
    action: ServiceAction,
    service: &ServiceName,
    escalate: bool,
) -> String {
    let invocation = manager.invocation(action.as_str(), service.as_str());
    if escalate {
        format!("sudo {invocation}")
    } else {
        invocation
    }
}

/// Heuristic detecting that the primary manager's executable is absent on
/// the remote host.
///
/// Matching is a case-sensitive substring search over stderr only; the exit
/// code is ignored because shells disagree on the status they report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackSignal {
    needle: String,
}

impl FallbackSignal {
    /// Creates a signal matching `needle` in stderr.
    #[must_use]
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }

    /// Signal configured on `config`.
    #[must_use]
    pub fn from_config(config: &ToggleConfig) -> Self {
        Self::new(config.fallback_signal.clone())
    }

    /// Substring being searched for.
    #[must_use]
    pub fn needle(&self) -> &str {
        self.needle.as_str()
    }

    /// Returns `true` when `result` reports the primary manager as missing.
    #[must_use]
    pub fn primary_unavailable(&self, result: &CommandResult) -> bool {
        result.stderr.contains(self.needle.as_str())
    }
}
