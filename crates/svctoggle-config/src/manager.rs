//! Service-management command styles understood by the controller.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A remote service-management tool and its argument order.
///
/// `systemctl` takes the verb before the unit name while the SysV `service`
/// wrapper takes the service name first.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ServiceManager {
    /// `systemctl <verb> <service>`.
    Systemctl,
    /// `service <service> <verb>`.
    Service,
}

impl ServiceManager {
    /// Name of the executable invoked on the remote host.
    #[must_use]
    pub const fn executable(self) -> &'static str {
        match self {
            Self::Systemctl => "systemctl",
            Self::Service => "service",
        }
    }

    /// Builds the command line applying `verb` to `service`.
    #[must_use]
    pub fn invocation(self, verb: &str, service: &str) -> String {
        match self {
            Self::Systemctl => format!("{} {verb} {service}", self.executable()),
            Self::Service => format!("{} {service} {verb}", self.executable()),
        }
    }
}

/// Errors encountered while parsing a [`ServiceManager`] from text.
pub type ServiceManagerParseError = strum::ParseError;
