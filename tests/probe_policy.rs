//! Polling-policy tests: the default no-ceiling behavior and the
//! configurable attempt ceiling.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::time::Duration;

use autopcr_shell::{LifecycleController, ServiceStatus};
use common::{MockBackend, fast_config, free_port, wait_for_status};

#[tokio::test]
async fn default_policy_polls_indefinitely_while_backend_warms_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = LifecycleController::new(fast_config(free_port()), dir.path());

    // Backend never listens and never errors: "not ready yet" forever.
    controller
        .start(Box::new(MockBackend::never_listening()))
        .unwrap();

    // Many probe periods later the supervisor is still patiently Starting —
    // that is the contract, not a hang.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(controller.status(), ServiceStatus::Starting);

    controller.stop();
    assert_eq!(controller.status(), ServiceStatus::Stopped);
}

#[tokio::test]
async fn configured_ceiling_turns_warmup_into_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fast_config(free_port());
    config.probe.max_attempts = Some(3);

    let mut controller = LifecycleController::new(config, dir.path());
    let mut status_rx = controller.watch_status();

    controller
        .start(Box::new(MockBackend::never_listening()))
        .unwrap();

    let status = wait_for_status(&mut status_rx, |s| s.is_terminal()).await;
    match &status {
        ServiceStatus::Failed { reason } => {
            assert!(reason.contains("3 probe attempts"), "reason: {reason}");
        }
        other => panic!("expected probe give-up, got {other:?}"),
    }
}

#[tokio::test]
async fn readiness_is_sticky_once_observed() {
    let dir = tempfile::tempdir().unwrap();
    let port = free_port();

    let mut controller = LifecycleController::new(fast_config(port), dir.path());
    let mut status_rx = controller.watch_status();

    controller.start(Box::new(MockBackend::new())).unwrap();
    let status = wait_for_status(&mut status_rx, |s| s.is_ready() || s.is_terminal()).await;
    assert_eq!(status, ServiceStatus::Ready);

    // The probe disarms after success; readiness holds as long as the worker
    // keeps running.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(controller.status(), ServiceStatus::Ready);

    controller.stop();
}
