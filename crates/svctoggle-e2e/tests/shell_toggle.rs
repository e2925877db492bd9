//! End-to-end toggling through a real shell.
//!
//! Each test builds a fake host whose `PATH` holds scripted service managers,
//! then drives the controller through `bash -c`. A manager missing from the
//! fake host surfaces exactly as it would over SSH: bash prints
//! `command not found` and exits 127. Tests are skipped if bash is absent.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clarity and assertions"
)]

use std::fs;
use std::time::Duration;

use rstest::{fixture, rstest};
use svctoggle::telemetry;
use svctoggle::testing::StaticResolver;
use svctoggle::{
    Mechanism, PollingProbe, Readiness, RemoteServiceController, ServiceAction, ServiceName,
    Target, ToggleError,
};
use svctoggle_config::{LogFormat, ServiceManager, ToggleConfig};
use svctoggle_e2e::bash_available;
use svctoggle_e2e::fixtures::{FakeHost, ManagerBehaviour};
use svctoggle_e2e::node_state::FileReadinessSource;
use svctoggle_e2e::shell::LocalShellExecutor;
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(3);
const SHORT_WAIT: Duration = Duration::from_millis(300);

/// Skips the test if bash is not available.
macro_rules! require_bash {
    () => {
        if !bash_available() {
            eprintln!("Skipping test: /bin/bash not available");
            return;
        }
    };
}

type ShellController =
    RemoteServiceController<StaticResolver, LocalShellExecutor, PollingProbe<FileReadinessSource>>;

#[fixture]
fn target() -> Target {
    Target::new("node-a")
}

#[fixture]
fn kubelet() -> ServiceName {
    ServiceName::new("kubelet").expect("valid service name")
}

fn shell_config() -> ToggleConfig {
    ToggleConfig {
        poll_interval: Duration::from_millis(20),
        escalate_privileges: false,
        log_filter: String::from("svctoggle=debug"),
        log_format: LogFormat::Compact,
        ..ToggleConfig::default()
    }
}

fn host(dir: &TempDir, initial: Readiness) -> FakeHost {
    FakeHost::create(dir.path(), initial).expect("create fake host")
}

fn controller(host: &FakeHost, config: ToggleConfig) -> ShellController {
    telemetry::initialise(&config).expect("install log output");
    let probe = PollingProbe::from_config(FileReadinessSource::new(host.state_path()), &config);
    RemoteServiceController::new(
        StaticResolver::new("127.0.0.1"),
        LocalShellExecutor::new(host.bin_dir()),
        probe,
        config,
    )
    .expect("valid configuration")
}

fn recorded_state(host: &FakeHost) -> String {
    fs::read_to_string(host.state_path())
        .expect("read node state")
        .trim()
        .to_owned()
}

#[rstest]
fn start_through_primary_reaches_ready(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::NotReady);
    host.install(ServiceManager::Systemctl, ManagerBehaviour::Cooperative)
        .expect("install systemctl");

    controller(&host, shell_config())
        .apply_action(ServiceAction::Start, &target, &kubelet, WAIT)
        .expect("start converges");

    assert_eq!(recorded_state(&host), "ready");
}

#[rstest]
fn restart_through_primary_passes_through_not_ready(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::Ready);
    host.install(ServiceManager::Systemctl, ManagerBehaviour::Cooperative)
        .expect("install systemctl");

    controller(&host, shell_config())
        .apply_action(ServiceAction::Restart, &target, &kubelet, WAIT)
        .expect("restart converges");

    assert_eq!(recorded_state(&host), "ready");
}

#[rstest]
fn missing_primary_falls_back_without_checking_exit(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::Ready);
    host.install(ServiceManager::Service, ManagerBehaviour::FailsAfterApplying)
        .expect("install service");

    controller(&host, shell_config())
        .apply_action(ServiceAction::Stop, &target, &kubelet, WAIT)
        .expect("stop converges despite secondary exit 1");

    assert_eq!(recorded_state(&host), "not_ready");
}

#[rstest]
fn missing_primary_with_validation_reports_secondary_failure(
    target: Target,
    kubelet: ServiceName,
) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::Ready);
    host.install(ServiceManager::Service, ManagerBehaviour::FailsAfterApplying)
        .expect("install service");
    let config = ToggleConfig {
        validate_fallback: true,
        ..shell_config()
    };

    let err = controller(&host, config)
        .apply_action(ServiceAction::Stop, &target, &kubelet, WAIT)
        .expect_err("secondary exit is validated");

    match err {
        ToggleError::Command {
            mechanism,
            command,
            result,
            ..
        } => {
            assert_eq!(mechanism, Mechanism::Secondary);
            assert_eq!(command, "service kubelet stop");
            assert_eq!(result.code, 1);
        }
        other => panic!("expected command error, got {other:?}"),
    }
}

#[rstest]
fn primary_failure_is_reported_without_fallback(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::NotReady);
    host.install(ServiceManager::Systemctl, ManagerBehaviour::UnitMissing)
        .expect("install systemctl");
    host.install(ServiceManager::Service, ManagerBehaviour::Cooperative)
        .expect("install service");

    let err = controller(&host, shell_config())
        .apply_action(ServiceAction::Start, &target, &kubelet, WAIT)
        .expect_err("primary exit 5 is a command error");

    match err {
        ToggleError::Command {
            mechanism, result, ..
        } => {
            assert_eq!(mechanism, Mechanism::Primary);
            assert_eq!(result.code, 5);
            assert!(result.stderr.contains("not found"));
        }
        other => panic!("expected command error, got {other:?}"),
    }
    assert_eq!(recorded_state(&host), "not_ready", "service was never run");
}

#[rstest]
fn restart_that_never_leaves_ready_times_out(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::Ready);
    host.install(ServiceManager::Systemctl, ManagerBehaviour::Inert)
        .expect("install systemctl");

    let err = controller(&host, shell_config())
        .apply_action(ServiceAction::Restart, &target, &kubelet, SHORT_WAIT)
        .expect_err("restart never observed not ready");

    assert_eq!(err.expected_state(), Some(Readiness::NotReady));
    assert!(matches!(
        err,
        ToggleError::Convergence {
            action: ServiceAction::Restart,
            timeout_ms: 300,
            ..
        }
    ));
}

#[rstest]
fn both_managers_missing_fails_convergence_not_dispatch(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::NotReady);

    let err = controller(&host, shell_config())
        .apply_action(ServiceAction::Start, &target, &kubelet, SHORT_WAIT)
        .expect_err("nothing starts the service");

    assert_eq!(err.expected_state(), Some(Readiness::Ready));
}

#[rstest]
fn dispatch_exposes_the_fallback_output(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::Ready);
    host.install(ServiceManager::Service, ManagerBehaviour::FailsAfterApplying)
        .expect("install service");
    let toggle = controller(&host, shell_config());
    let address = svctoggle::RemoteAddress::new("127.0.0.1", 22);

    let outcome = toggle
        .dispatch(ServiceAction::Stop, &target, &kubelet, &address)
        .expect("fallback dispatched");

    match outcome {
        svctoggle::DispatchOutcome::Fallback { result } => {
            assert_eq!(result.code, 1);
            assert!(result.stderr.contains("partial failure"));
        }
        svctoggle::DispatchOutcome::Primary => panic!("primary manager is absent"),
    }
}

#[rstest]
fn unbounded_timeout_waits_until_converged(target: Target, kubelet: ServiceName) {
    require_bash!();
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::Ready);
    host.install(ServiceManager::Systemctl, ManagerBehaviour::Cooperative)
        .expect("install systemctl");

    controller(&host, shell_config())
        .apply_action(ServiceAction::Restart, &target, &kubelet, Duration::MAX)
        .expect("restart converges without a deadline");

    assert_eq!(recorded_state(&host), "ready");
}

#[rstest]
fn unspawnable_shell_is_a_transport_failure(target: Target, kubelet: ServiceName) {
    let dir = TempDir::new().expect("create temp dir");
    let host = host(&dir, Readiness::NotReady);
    let config = shell_config();
    let probe = PollingProbe::from_config(FileReadinessSource::new(host.state_path()), &config);
    let toggle = RemoteServiceController::new(
        StaticResolver::new("127.0.0.1"),
        LocalShellExecutor::new(host.bin_dir()).with_shell(dir.path().join("no-such-shell")),
        probe,
        config,
    )
    .expect("valid configuration");

    let err = toggle
        .apply_action(ServiceAction::Start, &target, &kubelet, SHORT_WAIT)
        .expect_err("shell cannot start");

    match err {
        ToggleError::Transport {
            mechanism, command, ..
        } => {
            assert_eq!(mechanism, Mechanism::Primary);
            assert_eq!(command, "systemctl start kubelet");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn repeated_telemetry_initialisation_keeps_first_format() {
    let first = telemetry::initialise(&shell_config()).expect("install log output");
    let json = ToggleConfig {
        log_format: LogFormat::Json,
        ..shell_config()
    };
    let second = telemetry::initialise(&json).expect("second call is a no-op");

    assert_eq!(first, second);
    assert_eq!(second.format(), LogFormat::Compact);
}
