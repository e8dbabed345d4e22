//! Storage Records
//!
//! The flat wire representation of a [`Snapshot`](super::Snapshot): the
//! state is replaced by its serialized bytes and type tag.

use serde::{Deserialize, Serialize};

/// Value Object: Stored State Record
///
/// At most one record exists per `persistence_id`; writes overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Partition key
    pub persistence_id: String,
    /// Snapshot version
    pub version: u64,
    /// Serialized state payload
    pub payload: Vec<u8>,
    /// Type tag (manifest) used to resolve the payload's decoder
    pub type_tag: String,
    /// Event time in nanoseconds since epoch
    pub timestamp: i64,
    /// Partitioning hint
    pub shard: u64,
}
