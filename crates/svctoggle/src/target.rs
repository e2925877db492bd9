//! Identifiers for the node and service being toggled.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Logical node whose readiness is observed and whose host receives the
/// service command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    node_name: String,
}

impl Target {
    /// Creates a target for the named node.
    #[must_use]
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
        }
    }

    /// Name of the node.
    #[must_use]
    pub fn node_name(&self) -> &str {
        self.node_name.as_str()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.node_name)
    }
}

/// Connectable address of the remote host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteAddress {
    host: String,
    port: u16,
}

impl RemoteAddress {
    /// Joins a resolved host with the remote shell port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or IP literal.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Remote shell port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        // IPv6 literals need brackets to keep the port separator unambiguous.
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

/// Name of the remote daemon, validated for interpolation into a shell
/// command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    /// Validates and wraps a service name.
    ///
    /// Only ASCII alphanumerics and `-`, `_`, `.`, `@`, `:` are accepted;
    /// anything else could alter the remote shell command.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidServiceName`] when the name is empty or contains a
    /// disallowed character.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidServiceName> {
        let owned: String = name.into();
        if owned.is_empty() {
            return Err(InvalidServiceName::Empty);
        }
        if let Some(character) = owned.chars().find(|c| !is_allowed(*c)) {
            return Err(InvalidServiceName::DisallowedCharacter {
                name: owned,
                character,
            });
        }
        Ok(Self(owned))
    }

    /// Borrows the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

const fn is_allowed(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '-' | '_' | '.' | '@' | ':')
}

impl FromStr for ServiceName {
    type Err = InvalidServiceName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Reasons a service name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidServiceName {
    /// The name was empty.
    #[error("service name must not be empty")]
    Empty,
    /// The name contained a character outside the allowed set.
    #[error("service name '{name}' contains disallowed character {character:?}")]
    DisallowedCharacter {
        /// Rejected name.
        name: String,
        /// First offending character.
        character: char,
    },
}
