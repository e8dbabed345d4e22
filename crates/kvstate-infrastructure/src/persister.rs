//! Snapshot persister
//!
//! The single place where a snapshot crosses into the backend: encode,
//! optionally validate against the stored record, upsert. Reads go the other
//! way through the same codec. Coalescers decide *when* to call it.

use crate::codec::RecordCodec;
use kvstate_domain::error::Result;
use kvstate_domain::ports::{SnapshotValidator, StateGateway};
use kvstate_domain::value_objects::{Record, Snapshot};
use std::sync::Arc;
use tracing::{debug, warn};

/// Encodes, validates and writes snapshots; reads and decodes them back
#[derive(Debug, Clone)]
pub struct SnapshotPersister {
    codec: RecordCodec,
    gateway: Arc<dyn StateGateway>,
    validator: Option<Arc<dyn SnapshotValidator>>,
}

impl SnapshotPersister {
    /// Create a persister without validation
    pub fn new(codec: RecordCodec, gateway: Arc<dyn StateGateway>) -> Self {
        Self {
            codec,
            gateway,
            validator: None,
        }
    }

    /// Run `validator` before every write
    pub fn with_validator(mut self, validator: Arc<dyn SnapshotValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Codec used by this persister
    pub fn codec(&self) -> &RecordCodec {
        &self.codec
    }

    /// Write `snapshot` to the backend
    ///
    /// Encoding happens first, so a serialization failure never reaches the
    /// backend.
    pub async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let record = self.codec.encode(snapshot)?;
        self.persist_record(&record).await
    }

    /// Validate and write an already encoded record
    pub async fn persist_record(&self, record: &Record) -> Result<()> {
        if let Some(validator) = &self.validator {
            let stored = self.gateway.get(&record.persistence_id).await?;
            if let Err(e) = validator.validate(stored.as_ref(), record) {
                warn!(
                    persistence_id = %record.persistence_id,
                    validator = validator.name(),
                    error = %e,
                    "Snapshot rejected by validator"
                );
                return Err(e);
            }
        }

        self.gateway.upsert(record).await
    }

    /// Read the latest snapshot for `persistence_id`
    pub async fn load(&self, persistence_id: &str) -> Result<Option<Snapshot>> {
        let Some(record) = self.gateway.get(persistence_id).await? else {
            debug!(persistence_id, "No stored state");
            return Ok(None);
        };

        match self.codec.decode(&record) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(
                    persistence_id,
                    type_tag = %record.type_tag,
                    error = %e,
                    "Stored state could not be reconstructed"
                );
                Err(e)
            }
        }
    }
}
