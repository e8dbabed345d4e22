//! Write Coalescer Port
//!
//! Decides when a submitted snapshot actually reaches the backend.

use crate::error::Result;
use crate::value_objects::{LifecycleState, Snapshot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Write coalescer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalescerStats {
    /// Snapshots accepted by `submit`
    pub accepted: u64,
    /// Snapshots superseded by a newer one before reaching the backend
    pub coalesced: u64,
    /// Snapshots dropped inside a debounce window
    pub suppressed: u64,
    /// Snapshots written to the backend
    pub flushed: u64,
    /// Submissions refused (full queue or closed store)
    pub rejected: u64,
    /// Backend writes that failed
    pub failed: u64,
    /// Snapshots waiting for the next flush
    pub pending: u64,
}

impl CoalescerStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of accepted snapshots that did not cost a backend write
    pub fn savings_ratio(&self) -> f64 {
        if self.accepted == 0 {
            return 0.0;
        }
        (self.coalesced + self.suppressed) as f64 / self.accepted as f64
    }
}

/// Write coalescing strategy
///
/// # Implementations
///
/// - **Batched**: bounded queue drained by a periodic background flush,
///   last write per identifier wins, full flush on shutdown
/// - **Debounce**: synchronous writes, at most one per identifier per window
#[async_trait]
pub trait WriteCoalescer: Send + Sync + std::fmt::Debug {
    /// Hand a snapshot to the coalescer
    async fn submit(&self, snapshot: Snapshot) -> Result<()>;

    /// Stop accepting normal traffic and persist what is pending
    ///
    /// Idempotent. Returns once every pending snapshot was written or
    /// reported as failed.
    async fn shutdown(&self) -> Result<()>;

    /// Current statistics
    fn stats(&self) -> CoalescerStats;

    /// Current lifecycle phase
    fn lifecycle_state(&self) -> LifecycleState;

    /// Strategy name (e.g., "batched", "debounce")
    fn strategy_name(&self) -> &str;
}
