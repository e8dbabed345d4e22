//! Debounce coalescer tests

use crate::support::{FlakyBackend, account, persister, stored};
use kvstate_domain::error::Error;
use kvstate_domain::ports::WriteCoalescer;
use kvstate_domain::value_objects::{LifecycleState, Snapshot};
use kvstate_infrastructure::coalescer::DebounceCoalescer;
use std::sync::Arc;
use std::time::Duration;

fn snapshot(version: u64) -> Snapshot {
    Snapshot::new("account_1", account(i64::try_from(version).unwrap())).with_version(version)
}

fn coalescer(backend: &Arc<FlakyBackend>) -> DebounceCoalescer {
    DebounceCoalescer::new(persister(Arc::clone(backend)))
}

#[tokio::test(start_paused = true)]
async fn test_writes_inside_window_are_suppressed() {
    let backend = FlakyBackend::new_shared();
    let coalescer = coalescer(&backend);
    assert_eq!(coalescer.window(), Duration::from_secs(10));

    coalescer.submit(snapshot(1)).await.unwrap();
    coalescer.submit(snapshot(2)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(9)).await;
    coalescer.submit(snapshot(3)).await.unwrap();

    assert_eq!(backend.puts_for("account_1"), 1);
    assert_eq!(stored(&backend, "account_1").await.unwrap().version, 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    coalescer.submit(snapshot(4)).await.unwrap();

    assert_eq!(backend.puts_for("account_1"), 2);
    assert_eq!(stored(&backend, "account_1").await.unwrap().version, 4);

    let stats = coalescer.stats();
    assert_eq!(stats.accepted, 4);
    assert_eq!(stats.suppressed, 2);
    assert_eq!(stats.flushed, 2);
    assert_eq!(stats.pending, 0);
}

#[tokio::test(start_paused = true)]
async fn test_identifiers_are_debounced_independently() {
    let backend = FlakyBackend::new_shared();
    let coalescer = coalescer(&backend);

    coalescer.submit(snapshot(1)).await.unwrap();
    coalescer
        .submit(Snapshot::new("account_2", account(5)))
        .await
        .unwrap();

    assert_eq!(backend.puts_for("account_1"), 1);
    assert_eq!(backend.puts_for("account_2"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_disables_debounce() {
    let backend = FlakyBackend::new_shared();
    let coalescer = coalescer(&backend);

    coalescer.submit(snapshot(1)).await.unwrap();
    coalescer.shutdown().await.unwrap();
    coalescer.submit(snapshot(2)).await.unwrap();
    coalescer.shutdown().await.unwrap();

    assert_eq!(coalescer.lifecycle_state(), LifecycleState::Draining);
    assert_eq!(backend.puts_for("account_1"), 2);
    assert_eq!(stored(&backend, "account_1").await.unwrap().version, 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_does_not_open_window() {
    let backend = FlakyBackend::new_shared();
    let coalescer = coalescer(&backend);
    backend.fail_next_puts("account_1", 1);

    let err = coalescer.submit(snapshot(1)).await.unwrap_err();
    assert!(matches!(err, Error::BackendUnavailable { .. }), "got {err:?}");

    coalescer.submit(snapshot(2)).await.unwrap();
    assert_eq!(backend.puts_for("account_1"), 1);
    assert_eq!(stored(&backend, "account_1").await.unwrap().version, 2);
    assert_eq!(coalescer.stats().failed, 1);
}

#[tokio::test]
async fn test_concurrent_submits_write_once() {
    let backend = FlakyBackend::new_shared();
    let coalescer = Arc::new(coalescer(&backend));

    let tasks: Vec<_> = (1..=8)
        .map(|version| {
            let coalescer = Arc::clone(&coalescer);
            tokio::spawn(async move { coalescer.submit(snapshot(version)).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(backend.puts_for("account_1"), 1);
    assert_eq!(coalescer.stats().suppressed, 7);
}

#[tokio::test(start_paused = true)]
async fn test_expired_claims_are_evicted() {
    let backend = FlakyBackend::new_shared();
    let coalescer = coalescer(&backend);

    for id in ["a", "b"] {
        coalescer.submit(Snapshot::new(id, account(1))).await.unwrap();
    }
    assert_eq!(coalescer.tracked(), 2);

    tokio::time::sleep(Duration::from_secs(10)).await;
    coalescer.submit(Snapshot::new("c", account(1))).await.unwrap();
    assert_eq!(coalescer.tracked(), 1);

    coalescer.submit(Snapshot::new("a", account(2))).await.unwrap();
    assert_eq!(backend.puts_for("a"), 2);
    assert_eq!(coalescer.tracked(), 2);
}
