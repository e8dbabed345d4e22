//! Record codec and type registry tests

use crate::support::{Account, account, registry, unencodable_ledger};
use kvstate_domain::error::Error;
use kvstate_domain::value_objects::{Record, Snapshot, StateMessage, StateValue};
use kvstate_infrastructure::codec::{RecordCodec, TypeRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Cart {
    items: Vec<String>,
}

impl StateMessage for Cart {
    const TYPE_TAG: &'static str = "shop.Cart";
}

fn codec() -> RecordCodec {
    RecordCodec::new(Arc::new(registry()))
}

fn record(type_tag: &str, payload: &[u8]) -> Record {
    Record {
        persistence_id: "account_1".to_string(),
        version: 1,
        payload: payload.to_vec(),
        type_tag: type_tag.to_string(),
        timestamp: 42,
        shard: 0,
    }
}

#[test]
fn test_encode_then_decode_preserves_snapshot() {
    let codec = codec();
    let snapshot = Snapshot::new("account_1", account(250))
        .with_version(7)
        .with_timestamp(1_700_000_000_000_000_000)
        .with_shard(3);

    let record = codec.encode(&snapshot).unwrap();
    assert_eq!(record.type_tag, Account::TYPE_TAG);
    assert_eq!(record.version, 7);
    assert_eq!(record.shard, 3);

    let decoded = codec.decode(&record).unwrap();
    assert_eq!(decoded, snapshot);
    assert_eq!(decoded.state.unpack::<Account>().unwrap(), account(250));
}

#[test]
fn test_encode_rejects_empty_identifier() {
    let snapshot = Snapshot::new("  ", account(1));
    let err = codec().encode(&snapshot).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }), "got {err:?}");
}

#[test]
fn test_decode_unregistered_type_fails() {
    let err = codec()
        .decode(&record("shop.Cart", br#"{"items":[]}"#))
        .unwrap_err();
    match err {
        Error::UnknownType {
            type_tag,
            persistence_id,
        } => {
            assert_eq!(type_tag, "shop.Cart");
            assert_eq!(persistence_id.as_deref(), Some("account_1"));
        }
        other => panic!("Expected UnknownType, got {other:?}"),
    }
}

#[test]
fn test_decode_empty_payload_fails() {
    let err = codec().decode(&record(Account::TYPE_TAG, b"")).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[test]
fn test_decode_garbage_payload_fails() {
    let err = codec()
        .decode(&record(Account::TYPE_TAG, b"{\"owner\": 5}"))
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[test]
fn test_decoder_producing_wrong_type_is_rejected() {
    let mut registry = TypeRegistry::new();
    registry.register_decoder(Account::TYPE_TAG, StateValue::decode::<Cart>);

    let err = registry
        .decode(Account::TYPE_TAG, br#"{"items":["a"]}"#)
        .unwrap_err();
    match err {
        Error::Unpack { expected, actual, .. } => {
            assert_eq!(expected, Account::TYPE_TAG);
            assert_eq!(actual, Cart::TYPE_TAG);
        }
        other => panic!("Expected Unpack, got {other:?}"),
    }
}

#[test]
fn test_registry_lists_sorted_tags() {
    let registry = TypeRegistry::new().with::<Cart>().with::<Account>();
    assert_eq!(registry.len(), 2);
    assert!(registry.contains("shop.Cart"));
    assert!(!registry.contains("shop.Order"));
    assert_eq!(registry.type_tags(), vec!["bank.Account", "shop.Cart"]);
}

#[test]
fn test_unpack_to_other_type_fails() {
    let snapshot = codec()
        .decode(&record(Account::TYPE_TAG, br#"{"owner":"bob","balance":3}"#))
        .unwrap();
    assert!(snapshot.state.is::<Account>());
    assert!(matches!(
        snapshot.state.unpack::<Cart>(),
        Err(Error::Unpack { .. })
    ));
}

#[test]
fn test_unregistered_manifest_with_empty_payload_is_unknown_type() {
    let err = codec().decode(&record("manifest", b"")).unwrap_err();
    assert!(matches!(err, Error::UnknownType { .. }), "got {err:?}");
}

#[test]
fn test_codec_errors_name_the_identifier() {
    let err = codec()
        .decode(&record(Account::TYPE_TAG, b"{\"owner\": 5}"))
        .unwrap_err();
    assert!(err.to_string().contains("'account_1'"), "got {err}");

    let err = codec()
        .encode(&Snapshot::new("ledger_1", unencodable_ledger()))
        .unwrap_err();
    match &err {
        Error::Serialization { persistence_id, .. } => {
            assert_eq!(persistence_id.as_deref(), Some("ledger_1"));
        }
        other => panic!("Expected Serialization, got {other:?}"),
    }
    assert!(err.to_string().contains("'ledger_1'"), "got {err}");
}
