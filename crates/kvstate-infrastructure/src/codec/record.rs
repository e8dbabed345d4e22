//! Record codec
//!
//! Converts snapshots to storage records and back.

use super::registry::TypeRegistry;
use kvstate_domain::error::Result;
use kvstate_domain::value_objects::{Record, Snapshot};
use std::sync::Arc;

/// Snapshot ⇄ record converter
#[derive(Debug, Clone)]
pub struct RecordCodec {
    registry: Arc<TypeRegistry>,
}

impl RecordCodec {
    /// Create a codec resolving payload types through `registry`
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Registry used for decoding
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Serialize a snapshot into a record
    ///
    /// Codec errors carry the snapshot identifier.
    ///
    /// Fails with `InvalidArgument` for an empty identifier and with
    /// `Serialization` when the state cannot be encoded; no partial record
    /// is ever produced.
    pub fn encode(&self, snapshot: &Snapshot) -> Result<Record> {
        snapshot.validate()?;
        let payload = snapshot
            .state
            .encode()
            .map_err(|e| e.with_persistence_id(&snapshot.persistence_id))?;

        Ok(Record {
            persistence_id: snapshot.persistence_id.clone(),
            version: snapshot.version,
            payload,
            type_tag: snapshot.state.type_tag().to_string(),
            timestamp: snapshot.timestamp,
            shard: snapshot.shard,
        })
    }

    /// Rebuild a snapshot from a record
    pub fn decode(&self, record: &Record) -> Result<Snapshot> {
        let state = self
            .registry
            .decode(&record.type_tag, &record.payload)
            .map_err(|e| e.with_persistence_id(&record.persistence_id))?;

        Ok(Snapshot {
            persistence_id: record.persistence_id.clone(),
            state,
            version: record.version,
            timestamp: record.timestamp,
            shard: record.shard,
        })
    }
}
