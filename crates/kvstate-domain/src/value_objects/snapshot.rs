//! Durable State Snapshots
//!
//! The domain object the host runtime checkpoints: the latest materialized
//! state of one entity together with its version and event time.

use super::state::{StateMessage, StateValue};
use crate::error::{Error, Result};

/// Value Object: Durable State Snapshot
///
/// ## Business Rules
///
/// - `persistence_id` is never empty and is the sole key of the stored record
/// - `version` and `timestamp` are supplied by the caller; the store does not
///   enforce monotonicity unless a validator is configured
/// - `shard` is an informational partitioning hint, never used for routing
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Unique identifier of the entity
    pub persistence_id: String,
    /// Typed state payload
    pub state: StateValue,
    /// Snapshot version
    pub version: u64,
    /// Event time in nanoseconds since the Unix epoch
    pub timestamp: i64,
    /// Partitioning hint
    pub shard: u64,
}

impl Snapshot {
    /// Create a snapshot at version 0 stamped with the current time
    pub fn new<S: Into<String>, T: StateMessage>(persistence_id: S, state: T) -> Self {
        Self::from_value(persistence_id, StateValue::pack(state))
    }

    /// Create a snapshot from an already packed state value
    pub fn from_value<S: Into<String>>(persistence_id: S, state: StateValue) -> Self {
        Self {
            persistence_id: persistence_id.into(),
            state,
            version: 0,
            timestamp: now_nanos(),
            shard: 0,
        }
    }

    /// Set the version
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Set the event timestamp (nanoseconds since epoch)
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the shard hint
    pub fn with_shard(mut self, shard: u64) -> Self {
        self.shard = shard;
        self
    }

    /// Reject snapshots that can never be stored
    pub fn validate(&self) -> Result<()> {
        if self.persistence_id.trim().is_empty() {
            return Err(Error::invalid_argument("persistence_id cannot be empty"));
        }
        Ok(())
    }
}

/// Current wall-clock time in nanoseconds since the Unix epoch
///
/// Saturates at `i64::MAX` past the year 2262.
pub fn now_nanos() -> i64 {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or(i64::MAX)
}
