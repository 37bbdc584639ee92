//! End-to-end tests for registration, dispatch and cancellation.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use clc_cli::CliError;
use clc_cli::commands::{MapGetCommand, register_all};
use clc_plug::{CancelReason, CancelScope, CommandRegistry, Error};
use helpers::{FakeCluster, app, app_with, run, run_scoped};

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = CommandRegistry::new();
    register_all(&mut registry).expect("first registration");

    let err = registry
        .register("map:get", Arc::new(MapGetCommand))
        .expect_err("duplicate");

    assert!(matches!(err, Error::DuplicateCommand(ref path) if path == "map:get"));
    assert_eq!(registry.len(), 10);
}

#[tokio::test]
async fn missing_cluster_is_reported() {
    let err = run(&app(), &["map", "get", "k"]).await.expect_err("no gateway");

    assert!(matches!(err, CliError::Command(Error::NotConnected)));
}

#[tokio::test]
async fn interrupt_cancels_a_stalled_invocation() {
    let app = app_with(FakeCluster::stalled());
    let scope = CancelScope::new();
    let interrupt = scope.clone();

    let (result, ()) = tokio::join!(run_scoped(&app, &["map", "get", "k"], scope), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        interrupt.cancel();
    });

    let err = result.expect_err("canceled");
    assert!(err.is_canceled());
    assert!(matches!(
        err,
        CliError::Command(Error::Canceled(CancelReason::Interrupted))
    ));
}

#[tokio::test(start_paused = true)]
async fn timeout_flag_sets_a_deadline() {
    let app = app_with(FakeCluster::stalled());

    let err = run(&app, &["queue", "poll", "--timeout", "2"])
        .await
        .expect_err("deadline");

    assert!(matches!(
        err,
        CliError::Command(Error::Canceled(CancelReason::DeadlineExceeded))
    ));
}

#[tokio::test]
async fn usage_errors_do_not_run_anything() {
    let cluster = FakeCluster::new();
    let app = app_with(cluster.clone());

    let err = run(&app, &["map", "get"]).await.expect_err("missing key");

    assert!(matches!(err, CliError::Usage(_)));
    assert!(cluster.calls().is_empty());
}
