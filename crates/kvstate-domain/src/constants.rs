//! Domain layer constants
//!
//! Item attribute names shared by every backend and the coalescing defaults
//! used when no configuration overrides them.

use std::time::Duration;

// ============================================================================
// ITEM ATTRIBUTE NAMES
// ============================================================================

/// Partition key attribute
pub const ATTR_PERSISTENCE_ID: &str = "PersistenceID";

/// Snapshot version attribute (numeric)
pub const ATTR_VERSION_NUMBER: &str = "VersionNumber";

/// Serialized state payload attribute (binary)
pub const ATTR_STATE_PAYLOAD: &str = "StatePayload";

/// Payload type tag attribute (string)
pub const ATTR_STATE_MANIFEST: &str = "StateManifest";

/// Event time attribute, nanoseconds since epoch (numeric)
pub const ATTR_TIMESTAMP: &str = "Timestamp";

/// Shard hint attribute (numeric)
pub const ATTR_SHARD_NUMBER: &str = "ShardNumber";

// ============================================================================
// COALESCING DEFAULTS
// ============================================================================

/// Minimum time between two accepted writes for one identifier (debounce mode)
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_secs(10);

/// Period between two batched flush cycles
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Capacity of the pending write queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// How long an enqueue may wait for queue space before failing
pub const DEFAULT_ENQUEUE_TIMEOUT: Duration = Duration::from_secs(1);
