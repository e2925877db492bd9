//! Remote service toggling with manager fallback and convergence waits.
//!
//! [`RemoteServiceController::apply_action`] resolves the node's address,
//! dispatches the action through the primary service manager, substitutes the
//! secondary manager once if the primary executable is missing, and then
//! blocks until the node's readiness matches what the action implies.

use std::time::Duration;

use svctoggle_config::ToggleConfig;

use crate::action::ServiceAction;
use crate::command::{CommandResult, FallbackSignal, Mechanism, render_command};
use crate::error::{SetupError, ToggleError, duration_millis};
use crate::readiness::{Readiness, ReadinessProbe};
use crate::remote::{AddressResolver, RemoteExecutor};
use crate::report;
use crate::target::{RemoteAddress, ServiceName, Target};

/// How the action reached the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The primary command exited zero.
    Primary,
    /// The primary manager was missing and the secondary command ran.
    Fallback {
        /// Output of the secondary command.
        result: CommandResult,
    },
}

/// Applies lifecycle actions to a service on a remote node.
///
/// Callers must serialise actions against the same target; overlapping
/// invocations are not coordinated.
#[derive(Debug)]
pub struct RemoteServiceController<R, X, P> {
    resolver: R,
    executor: X,
    probe: P,
    config: ToggleConfig,
    signal: FallbackSignal,
}

impl<R, X, P> RemoteServiceController<R, X, P>
where
    R: AddressResolver,
    X: RemoteExecutor,
    P: ReadinessProbe,
{
    /// Builds a controller from its collaborators and an explicit
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Config`] when `config` fails validation.
    pub fn new(resolver: R, executor: X, probe: P, config: ToggleConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let signal = FallbackSignal::from_config(&config);
        Ok(Self {
            resolver,
            executor,
            probe,
            config,
            signal,
        })
    }

    /// Replaces the fallback heuristic.
    #[must_use]
    pub fn with_fallback_signal(mut self, signal: FallbackSignal) -> Self {
        self.signal = signal;
        self
    }

    /// Configuration the controller was built with.
    #[must_use]
    pub const fn config(&self) -> &ToggleConfig {
        &self.config
    }

    /// Applies `action` to `service` on `target` and waits for convergence.
    ///
    /// `timeout` bounds each readiness wait; a restart performs two waits.
    ///
    /// # Errors
    ///
    /// - [`ToggleError::Resolution`] when the target has no address.
    /// - [`ToggleError::Transport`] when either command cannot be sent.
    /// - [`ToggleError::Command`] when the primary command exits non-zero
    ///   without the fallback signal, or when the secondary command exits
    ///   non-zero and `validate_fallback` is set.
    /// - [`ToggleError::Convergence`] when the node does not reach the
    ///   expected state within `timeout`.
    pub fn apply_action(
        &self,
        action: ServiceAction,
        target: &Target,
        service: &ServiceName,
        timeout: Duration,
    ) -> Result<(), ToggleError> {
        let address = self.resolve(target)?;
        self.dispatch(action, target, service, &address)?;
        self.await_convergence(action, target, timeout)
    }

    /// Applies `action` using the configured node state timeout.
    ///
    /// # Errors
    ///
    /// See [`apply_action`](Self::apply_action).
    pub fn apply_action_with_default_timeout(
        &self,
        action: ServiceAction,
        target: &Target,
        service: &ServiceName,
    ) -> Result<(), ToggleError> {
        self.apply_action(action, target, service, self.config.node_state_timeout)
    }

    fn resolve(&self, target: &Target) -> Result<RemoteAddress, ToggleError> {
        let host = self
            .resolver
            .resolve(target)
            .map_err(|source| ToggleError::Resolution {
                node: target.node_name().to_owned(),
                source,
            })?;
        Ok(RemoteAddress::new(host, self.config.ssh_port))
    }

    /// Sends the action through the primary manager, falling back at most
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleError::Transport`] or [`ToggleError::Command`].
    pub fn dispatch(
        &self,
        action: ServiceAction,
        target: &Target,
        service: &ServiceName,
        address: &RemoteAddress,
    ) -> Result<DispatchOutcome, ToggleError> {
        let (primary_command, primary) =
            self.run(Mechanism::Primary, action, target, service, address)?;

        if !self.signal.primary_unavailable(&primary) {
            if !primary.succeeded() {
                return Err(command_error(action, Mechanism::Primary, primary_command, primary));
            }
            return Ok(DispatchOutcome::Primary);
        }

        report::fallback_selected(
            target,
            self.config.primary_manager,
            self.config.fallback_manager,
        );
        let (secondary_command, secondary) =
            self.run(Mechanism::Secondary, action, target, service, address)?;
        if !self.config.validate_fallback {
            report::fallback_unvalidated(target, &secondary);
        } else if !secondary.succeeded() {
            return Err(command_error(
                action,
                Mechanism::Secondary,
                secondary_command,
                secondary,
            ));
        }
        Ok(DispatchOutcome::Fallback { result: secondary })
    }

    fn run(
        &self,
        mechanism: Mechanism,
        action: ServiceAction,
        target: &Target,
        service: &ServiceName,
        address: &RemoteAddress,
    ) -> Result<(String, CommandResult), ToggleError> {
        let command = render_command(
            mechanism.manager(&self.config),
            action,
            service,
            self.config.escalate_privileges,
        );
        report::command_attempted(target, address, mechanism, &command);
        match self.executor.execute(&command, address) {
            Ok(result) => {
                report::command_completed(target, mechanism, &result);
                Ok((command, result))
            }
            Err(source) => Err(ToggleError::Transport {
                node: target.node_name().to_owned(),
                address: address.to_string(),
                command,
                mechanism,
                source,
            }),
        }
    }

    fn await_convergence(
        &self,
        action: ServiceAction,
        target: &Target,
        timeout: Duration,
    ) -> Result<(), ToggleError> {
        for &expected in action.convergence_plan() {
            self.await_state(action, target, expected, timeout)?;
        }
        Ok(())
    }

    fn await_state(
        &self,
        action: ServiceAction,
        target: &Target,
        expected: Readiness,
        timeout: Duration,
    ) -> Result<(), ToggleError> {
        report::convergence_started(target, expected, timeout);
        if self.probe.wait_for(target, expected, timeout) {
            report::convergence_reached(target, expected);
            return Ok(());
        }
        report::convergence_failed(target, expected, timeout);
        Err(ToggleError::Convergence {
            action,
            node: target.node_name().to_owned(),
            expected,
            timeout_ms: duration_millis(timeout),
        })
    }
}

fn command_error(
    action: ServiceAction,
    mechanism: Mechanism,
    command: String,
    result: CommandResult,
) -> ToggleError {
    ToggleError::Command {
        action,
        mechanism,
        command,
        result: Box::new(result),
    }
}
