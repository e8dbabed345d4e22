//! Write coalescing configuration types

use crate::coalescer::{BatchedConfig, QueueFullPolicy};
use kvstate_domain::constants::{
    DEFAULT_DEBOUNCE_WINDOW, DEFAULT_ENQUEUE_TIMEOUT, DEFAULT_FLUSH_INTERVAL,
    DEFAULT_QUEUE_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coalescing strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoalescingStrategy {
    /// Bounded queue with periodic flush
    #[default]
    Batched,
    /// Synchronous writes, one per identifier per window
    Debounce,
}

/// Behavior of a batched `submit` when the queue is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FullQueuePolicy {
    /// Wait up to `enqueue_timeout_ms` for space
    #[default]
    Block,
    /// Fail immediately
    Reject,
}

/// Write coalescing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoalescingConfig {
    /// Strategy
    pub strategy: CoalescingStrategy,

    /// Batched: period between flush cycles
    pub flush_interval_ms: u64,

    /// Batched: maximum queued snapshots
    pub queue_capacity: usize,

    /// Batched: full-queue behavior
    pub full_queue_policy: FullQueuePolicy,

    /// Batched: maximum wait for a free slot under `block`
    pub enqueue_timeout_ms: u64,

    /// Debounce: minimum time between two writes for one identifier
    pub debounce_window_ms: u64,
}

impl Default for CoalescingConfig {
    fn default() -> Self {
        Self {
            strategy: CoalescingStrategy::Batched,
            flush_interval_ms: millis(DEFAULT_FLUSH_INTERVAL),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            full_queue_policy: FullQueuePolicy::Block,
            enqueue_timeout_ms: millis(DEFAULT_ENQUEUE_TIMEOUT),
            debounce_window_ms: millis(DEFAULT_DEBOUNCE_WINDOW),
        }
    }
}

impl CoalescingConfig {
    /// Flush interval as a duration
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// Enqueue timeout as a duration
    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms)
    }

    /// Debounce window as a duration
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    /// Settings for the batched coalescer
    pub fn to_batched_config(&self) -> BatchedConfig {
        let policy = match self.full_queue_policy {
            FullQueuePolicy::Block => QueueFullPolicy::Block {
                timeout: self.enqueue_timeout(),
            },
            FullQueuePolicy::Reject => QueueFullPolicy::Reject,
        };
        BatchedConfig::default()
            .with_queue_capacity(self.queue_capacity)
            .with_flush_interval(self.flush_interval())
            .with_queue_full_policy(policy)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
