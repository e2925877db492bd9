//! Controller behaviour observed through the scripted collaborator doubles.
//!
//! These tests check the command sequence and the ordering of readiness waits
//! without spawning processes.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clarity and assertions"
)]

use std::time::Duration;

use rstest::{fixture, rstest};
use svctoggle::testing::{ScriptedExecutor, ScriptedProbe, StaticResolver};
use svctoggle::{
    CommandResult, Readiness, RemoteServiceController, ServiceAction, ServiceName, Target,
    ToggleError,
};
use svctoggle_config::ToggleConfig;

const TIMEOUT: Duration = Duration::from_secs(30);

#[fixture]
fn target() -> Target {
    Target::new("worker-2")
}

#[fixture]
fn kubelet() -> ServiceName {
    ServiceName::new("kubelet").expect("valid service name")
}

fn missing_systemctl() -> CommandResult {
    CommandResult::new(127, "", "bash: systemctl: command not found\n")
}

fn toggle<'a>(
    executor: &'a ScriptedExecutor,
    probe: &'a ScriptedProbe,
    config: ToggleConfig,
) -> RemoteServiceController<StaticResolver, &'a ScriptedExecutor, &'a ScriptedProbe> {
    RemoteServiceController::new(StaticResolver::new("10.1.2.3"), executor, probe, config)
        .expect("valid configuration")
}

#[rstest]
#[case::start(ServiceAction::Start, &[Readiness::Ready])]
#[case::stop(ServiceAction::Stop, &[Readiness::NotReady])]
#[case::restart(ServiceAction::Restart, &[Readiness::NotReady, Readiness::Ready])]
fn waits_follow_the_action(
    #[case] action: ServiceAction,
    #[case] expected: &[Readiness],
    target: Target,
    kubelet: ServiceName,
) {
    let executor = ScriptedExecutor::new();
    let probe = ScriptedProbe::new();

    toggle(&executor, &probe, ToggleConfig::default())
        .apply_action(action, &target, &kubelet, TIMEOUT)
        .expect("action converges");

    assert_eq!(probe.expected_states(), expected);
    assert!(probe.waits().iter().all(|wait| wait.timeout == TIMEOUT));
    let commands = executor.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(
        commands.first().map(|c| c.command.as_str()),
        Some(format!("sudo systemctl {action} kubelet").as_str())
    );
}

#[rstest]
fn fallback_runs_once_and_is_addressed_like_the_primary(target: Target, kubelet: ServiceName) {
    let executor = ScriptedExecutor::new();
    executor.enqueue_result(missing_systemctl());
    executor.enqueue_result(missing_systemctl());
    let probe = ScriptedProbe::new();

    toggle(&executor, &probe, ToggleConfig::default())
        .apply_action(ServiceAction::Stop, &target, &kubelet, TIMEOUT)
        .expect("stop converges");

    let commands: Vec<_> = executor
        .commands()
        .into_iter()
        .map(|c| (c.command, c.address))
        .collect();
    assert_eq!(
        commands,
        vec![
            (
                String::from("sudo systemctl stop kubelet"),
                String::from("10.1.2.3:22")
            ),
            (
                String::from("sudo service kubelet stop"),
                String::from("10.1.2.3:22")
            ),
        ]
    );
    assert_eq!(probe.expected_states(), vec![Readiness::NotReady]);
}

#[rstest]
fn restart_stops_waiting_after_first_failure(target: Target, kubelet: ServiceName) {
    let executor = ScriptedExecutor::new();
    let probe = ScriptedProbe::new();
    probe.enqueue(false);

    let err = toggle(&executor, &probe, ToggleConfig::default())
        .apply_action(ServiceAction::Restart, &target, &kubelet, TIMEOUT)
        .expect_err("restart never leaves ready");

    assert_eq!(err.expected_state(), Some(Readiness::NotReady));
    assert_eq!(probe.expected_states(), vec![Readiness::NotReady]);
}

#[rstest]
fn transport_failure_skips_fallback_and_waits(target: Target, kubelet: ServiceName) {
    let executor = ScriptedExecutor::new();
    executor.enqueue_transport_failure("connection refused");
    let probe = ScriptedProbe::new();

    let err = toggle(&executor, &probe, ToggleConfig::default())
        .apply_action(ServiceAction::Start, &target, &kubelet, TIMEOUT)
        .expect_err("channel is down");

    assert!(matches!(err, ToggleError::Transport { .. }));
    assert_eq!(executor.commands().len(), 1);
    assert!(probe.waits().is_empty());
}

#[rstest]
fn unresolvable_node_sends_nothing(target: Target, kubelet: ServiceName) {
    let executor = ScriptedExecutor::new();
    let probe = ScriptedProbe::new();
    let controller = RemoteServiceController::new(
        StaticResolver::failing(),
        &executor,
        &probe,
        ToggleConfig::default(),
    )
    .expect("valid configuration");

    let err = controller
        .apply_action(ServiceAction::Stop, &target, &kubelet, TIMEOUT)
        .expect_err("node has no address");

    assert!(matches!(err, ToggleError::Resolution { .. }));
    assert!(err.to_string().contains("worker-2"));
    assert!(executor.commands().is_empty());
    assert!(probe.waits().is_empty());
}
