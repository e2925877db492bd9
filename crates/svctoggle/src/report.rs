//! Structured log records emitted while an action is applied.
//!
//! These events are diagnostic only. Each attempted command and its captured
//! output is recorded so a failed run can be reconstructed from the log.

use std::time::Duration;

use svctoggle_config::ServiceManager;

use crate::command::{CommandResult, Mechanism};
use crate::error::duration_millis;
use crate::readiness::Readiness;
use crate::target::{RemoteAddress, Target};

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
const CONVERGENCE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::convergence");

pub(crate) fn command_attempted(
    target: &Target,
    address: &RemoteAddress,
    mechanism: Mechanism,
    command: &str,
) {
    tracing::info!(
        target: DISPATCH_TARGET,
        event = "command_attempted",
        node = %target,
        %address,
        %mechanism,
        command,
        "attempting `{command}`"
    );
}

pub(crate) fn command_completed(target: &Target, mechanism: Mechanism, result: &CommandResult) {
    tracing::info!(
        target: DISPATCH_TARGET,
        event = "command_completed",
        node = %target,
        %mechanism,
        code = result.code,
        stdout = %result.stdout,
        stderr = %result.stderr,
        "remote command finished"
    );
}

pub(crate) fn fallback_selected(target: &Target, primary: ServiceManager, fallback: ServiceManager) {
    tracing::warn!(
        target: DISPATCH_TARGET,
        event = "fallback_selected",
        node = %target,
        %primary,
        %fallback,
        "primary service manager unavailable; falling back"
    );
}

pub(crate) fn fallback_unvalidated(target: &Target, result: &CommandResult) {
    tracing::debug!(
        target: DISPATCH_TARGET,
        event = "fallback_unvalidated",
        node = %target,
        code = result.code,
        "fallback exit status not validated"
    );
}

pub(crate) fn convergence_started(target: &Target, expected: Readiness, timeout: Duration) {
    tracing::info!(
        target: CONVERGENCE_TARGET,
        event = "convergence_started",
        node = %target,
        %expected,
        timeout_ms = duration_millis(timeout),
        "waiting for node to enter {expected}"
    );
}

pub(crate) fn convergence_reached(target: &Target, expected: Readiness) {
    tracing::info!(
        target: CONVERGENCE_TARGET,
        event = "convergence_reached",
        node = %target,
        %expected,
        "node entered {expected}"
    );
}

pub(crate) fn convergence_failed(target: &Target, expected: Readiness, timeout: Duration) {
    tracing::error!(
        target: CONVERGENCE_TARGET,
        event = "convergence_failed",
        node = %target,
        %expected,
        timeout_ms = duration_millis(timeout),
        "node failed to enter {expected}"
    );
}
