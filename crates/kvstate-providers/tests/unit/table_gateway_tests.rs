//! Table gateway tests

use kvstate_domain::constants::ATTR_TIMESTAMP;
use kvstate_domain::value_objects::{AttributeValue, Record};
use kvstate_domain::Error;
use kvstate_providers::backend::InMemoryBackend;
use kvstate_providers::gateway::record_to_item;
use kvstate_providers::{KeyValueBackend, StateGateway, TableGateway};
use std::sync::Arc;

fn gateway() -> (TableGateway, Arc<InMemoryBackend>) {
    let backend = InMemoryBackend::new_shared();
    (TableGateway::new("states_store", backend.clone()), backend)
}

fn record(version: u64) -> Record {
    Record {
        persistence_id: "account_1".to_string(),
        version,
        payload: Vec::new(),
        type_tag: "manifest".to_string(),
        timestamp: 1_700_000_000_000_000_000,
        shard: 1,
    }
}

#[tokio::test]
async fn test_upsert_and_read_back() {
    let (gateway, _) = gateway();
    let stored = record(1);

    gateway.upsert(&stored).await.unwrap();
    let fetched = gateway.get("account_1").await.unwrap();

    assert_eq!(fetched, Some(stored));
}

#[tokio::test]
async fn test_get_never_written_returns_none() {
    let (gateway, _) = gateway();
    assert!(gateway.get("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_is_idempotent_and_last_write_wins() {
    let (gateway, backend) = gateway();

    gateway.upsert(&record(1)).await.unwrap();
    gateway.upsert(&record(1)).await.unwrap();
    assert_eq!(backend.item_count("states_store"), 1);
    assert_eq!(gateway.get("account_1").await.unwrap(), Some(record(1)));

    gateway.upsert(&record(2)).await.unwrap();
    let fetched = gateway.get("account_1").await.unwrap().unwrap();
    assert_eq!(fetched.version, 2);
    assert_eq!(backend.item_count("states_store"), 1);
}

#[tokio::test]
async fn test_corrupt_stored_number_surfaces_error() {
    let (gateway, backend) = gateway();
    let mut item = record_to_item(&record(1));
    item.insert(ATTR_TIMESTAMP.to_string(), AttributeValue::N("12x".into()));
    backend
        .put_item("states_store", "account_1", item)
        .await
        .unwrap();

    match gateway.get("account_1").await {
        Err(Error::MalformedAttribute {
            persistence_id,
            attribute,
            ..
        }) => {
            assert_eq!(persistence_id, "account_1");
            assert_eq!(attribute, ATTR_TIMESTAMP);
        }
        other => panic!("Expected MalformedAttribute, got {other:?}"),
    }
}

#[tokio::test]
async fn test_gateway_reports_table() {
    let (gateway, _) = gateway();
    assert_eq!(gateway.table(), "states_store");
    assert!(format!("{gateway:?}").contains("memory"));
}
