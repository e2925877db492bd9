//! Remote service toggling for end-to-end cluster tests.
//!
//! The `svctoggle` crate starts, stops or restarts a background service on a
//! remote node and then blocks until the node's observed readiness reflects
//! the change. It owns only the decision logic; the remote shell, the node
//! address lookup and the readiness observation are supplied by the caller
//! through the [`AddressResolver`], [`RemoteExecutor`] and [`ReadinessProbe`]
//! traits.
//!
//! # Dispatch
//!
//! Actions go through a primary service manager (`systemctl` by default). If
//! the host reports the primary executable missing, detected by
//! [`FallbackSignal`], the action is retried once through the fallback
//! manager (`service`). No third manager is ever tried.
//!
//! # Convergence
//!
//! `stop` waits for `NotReady`, `start` waits for `Ready`, and `restart`
//! waits for `NotReady` followed by `Ready`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use svctoggle::{
//!     AddressResolver, BoxError, CommandResult, PollingProbe, Readiness, ReadinessSource,
//!     RemoteAddress, RemoteExecutor, RemoteServiceController, ServiceAction, ServiceName,
//!     Target,
//! };
//! use svctoggle_config::ToggleConfig;
//!
//! struct Inventory;
//!
//! impl AddressResolver for Inventory {
//!     fn resolve(&self, _target: &Target) -> Result<String, BoxError> {
//!         Ok(String::from("10.0.0.4"))
//!     }
//! }
//!
//! struct Ssh;
//!
//! impl RemoteExecutor for Ssh {
//!     fn execute(&self, command: &str, address: &RemoteAddress) -> Result<CommandResult, BoxError> {
//!         // Hand `command` to an SSH client connected to `address`.
//!         Ok(CommandResult::default())
//!     }
//! }
//!
//! struct NodeConditions;
//!
//! impl ReadinessSource for NodeConditions {
//!     fn observe(&self, _target: &Target) -> Result<Readiness, BoxError> {
//!         Ok(Readiness::Ready)
//!     }
//! }
//!
//! let config = ToggleConfig::default();
//! let probe = PollingProbe::from_config(NodeConditions, &config);
//! let controller = RemoteServiceController::new(Inventory, Ssh, probe, config)?;
//! let service = ServiceName::new("kubelet")?;
//! controller.apply_action(
//!     ServiceAction::Restart,
//!     &Target::new("node-a"),
//!     &service,
//!     Duration::from_secs(60),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod action;
pub mod command;
pub mod controller;
pub mod error;
pub mod readiness;
pub mod remote;
mod report;
pub mod target;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use self::action::ServiceAction;
pub use self::command::{CommandResult, FallbackSignal, Mechanism, render_command};
pub use self::controller::{DispatchOutcome, RemoteServiceController};
pub use self::error::{BoxError, SetupError, ToggleError};
pub use self::readiness::{PollingProbe, Readiness, ReadinessProbe, ReadinessSource};
pub use self::remote::{AddressResolver, RemoteExecutor};
pub use self::target::{InvalidServiceName, RemoteAddress, ServiceName, Target};
