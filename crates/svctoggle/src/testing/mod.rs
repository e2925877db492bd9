//! Scripted collaborator doubles for exercising the controller without a
//! cluster.
//!
//! Each double records what it was asked to do and replays queued responses,
//! falling back to success once the queue is empty.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::command::CommandResult;
use crate::error::BoxError;
use crate::readiness::{Readiness, ReadinessProbe};
use crate::remote::{AddressResolver, RemoteExecutor};
use crate::target::{RemoteAddress, Target};

/// Resolver returning a fixed host, or failing for every target.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    host: Option<String>,
}

impl StaticResolver {
    /// Resolves every target to `host`.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
        }
    }

    /// Fails every resolution.
    #[must_use]
    pub const fn failing() -> Self {
        Self { host: None }
    }
}

impl AddressResolver for StaticResolver {
    fn resolve(&self, target: &Target) -> Result<String, BoxError> {
        self.host
            .clone()
            .ok_or_else(|| format!("node '{target}' has no external address").into())
    }
}

/// A command observed by [`ScriptedExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedCommand {
    /// Command line sent to the host.
    pub command: String,
    /// Rendered destination address.
    pub address: String,
}

/// Executor replaying queued results and recording each command.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    calls: RefCell<Vec<ExecutedCommand>>,
    responses: RefCell<VecDeque<Result<CommandResult, String>>>,
}

impl ScriptedExecutor {
    /// Creates an executor that succeeds until responses are queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result returned by the next command.
    pub fn enqueue_result(&self, result: CommandResult) {
        self.responses.borrow_mut().push_back(Ok(result));
    }

    /// Queues a channel failure for the next command.
    pub fn enqueue_transport_failure(&self, message: impl Into<String>) {
        self.responses.borrow_mut().push_back(Err(message.into()));
    }

    /// Commands executed so far, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<ExecutedCommand> {
        self.calls.borrow().clone()
    }
}

impl RemoteExecutor for ScriptedExecutor {
    fn execute(&self, command: &str, address: &RemoteAddress) -> Result<CommandResult, BoxError> {
        self.calls.borrow_mut().push(ExecutedCommand {
            command: command.to_owned(),
            address: address.to_string(),
        });
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(message.into()),
            None => Ok(CommandResult::default()),
        }
    }
}

/// A wait observed by [`ScriptedProbe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedWait {
    /// State the controller waited for.
    pub expected: Readiness,
    /// Bound passed with the wait.
    pub timeout: Duration,
}

/// Probe replaying queued convergence outcomes.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    waits: RefCell<Vec<ObservedWait>>,
    outcomes: RefCell<VecDeque<bool>>,
}

impl ScriptedProbe {
    /// Creates a probe that converges until outcomes are queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the outcome of the next wait.
    pub fn enqueue(&self, converged: bool) {
        self.outcomes.borrow_mut().push_back(converged);
    }

    /// Waits requested so far, in order.
    #[must_use]
    pub fn waits(&self) -> Vec<ObservedWait> {
        self.waits.borrow().clone()
    }

    /// Expected states requested so far, in order.
    #[must_use]
    pub fn expected_states(&self) -> Vec<Readiness> {
        self.waits.borrow().iter().map(|wait| wait.expected).collect()
    }
}

impl ReadinessProbe for ScriptedProbe {
    fn wait_for(&self, _target: &Target, expected: Readiness, timeout: Duration) -> bool {
        self.waits
            .borrow_mut()
            .push(ObservedWait { expected, timeout });
        self.outcomes.borrow_mut().pop_front().unwrap_or(true)
    }
}
