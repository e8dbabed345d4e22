//! Write coalescing strategies
//!
//! | Strategy | Latency | Durability |
//! |----------|---------|------------|
//! | [`BatchedCoalescer`] | up to one flush interval | latest snapshot per identifier always flushed; shutdown drains |
//! | [`DebounceCoalescer`] | synchronous | writes inside a window are dropped |
//!
//! `BatchedCoalescer` is the default.

pub mod batched;
pub mod debounce;

pub use batched::{BatchedCoalescer, BatchedConfig, FlushReport, QueueFullPolicy};
pub use debounce::DebounceCoalescer;

use kvstate_domain::ports::CoalescerStats;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters behind [`CoalescerStats`]
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    pub accepted: AtomicU64,
    pub coalesced: AtomicU64,
    pub suppressed: AtomicU64,
    pub flushed: AtomicU64,
    pub rejected: AtomicU64,
    pub failed: AtomicU64,
}

impl StatsCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, pending: u64) -> CoalescerStats {
        CoalescerStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            flushed: self.flushed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            pending,
        }
    }
}
