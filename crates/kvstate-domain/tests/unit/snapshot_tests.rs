//! Snapshot tests

use kvstate_domain::error::Error;
use kvstate_domain::value_objects::{Snapshot, StateMessage, StateValue, now_nanos};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counter {
    value: u32,
}

impl StateMessage for Counter {
    const TYPE_TAG: &'static str = "test.Counter";
}

#[test]
fn test_new_snapshot_defaults() {
    let before = now_nanos();
    let snapshot = Snapshot::new("counter_1", Counter { value: 1 });

    assert_eq!(snapshot.persistence_id, "counter_1");
    assert_eq!(snapshot.version, 0);
    assert_eq!(snapshot.shard, 0);
    assert!(snapshot.timestamp >= before);
    assert_eq!(snapshot.state.type_tag(), Counter::TYPE_TAG);
}

#[test]
fn test_builders_set_fields() {
    let snapshot = Snapshot::new("counter_1", Counter { value: 1 })
        .with_version(9)
        .with_timestamp(123)
        .with_shard(4);

    assert_eq!(snapshot.version, 9);
    assert_eq!(snapshot.timestamp, 123);
    assert_eq!(snapshot.shard, 4);
}

#[test]
fn test_validate_rejects_blank_identifier() {
    for id in ["", "   "] {
        let err = Snapshot::new(id, Counter { value: 1 }).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }), "got {err:?}");
    }
    assert!(Snapshot::new("x", Counter { value: 1 }).validate().is_ok());
}

#[test]
fn test_snapshots_compare_by_state_contents() {
    let a = Snapshot::new("c", Counter { value: 1 }).with_timestamp(1);
    let b = Snapshot::from_value("c", StateValue::pack(Counter { value: 1 })).with_timestamp(1);
    let c = Snapshot::new("c", Counter { value: 2 }).with_timestamp(1);

    assert_eq!(a, b);
    assert_ne!(a, c);
}
