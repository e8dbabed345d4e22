//! Debounce write coalescer
//!
//! Writes go straight to the backend, but at most one per identifier per
//! debounce window. A snapshot submitted inside the window is acknowledged
//! and dropped; it is persisted only if a later write for the same
//! identifier lands after the window. The final snapshot of a burst can
//! therefore be lost, which makes this a lower-durability opt-in.
//!
//! Claims older than the window are evicted at most once per window, so
//! the tracking map stays proportional to the identifiers written recently.
//!
//! After `shutdown` the window is ignored and every write goes through, so
//! hosts can still force their last snapshots out.

use super::StatsCounters;
use crate::persister::SnapshotPersister;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kvstate_domain::constants::DEFAULT_DEBOUNCE_WINDOW;
use kvstate_domain::error::Result;
use kvstate_domain::ports::{CoalescerStats, WriteCoalescer};
use kvstate_domain::value_objects::{Lifecycle, LifecycleState, Snapshot};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, trace};

/// Per-identifier debounce coalescer
pub struct DebounceCoalescer {
    persister: Arc<SnapshotPersister>,
    window: Duration,
    last_sync: DashMap<String, Instant>,
    last_prune: Mutex<Instant>,
    lifecycle: Lifecycle,
    counters: StatsCounters,
}

impl DebounceCoalescer {
    /// Create a coalescer with the default 10 second window
    pub fn new(persister: Arc<SnapshotPersister>) -> Self {
        Self::with_window(persister, DEFAULT_DEBOUNCE_WINDOW)
    }

    /// Create a coalescer with a custom window
    pub fn with_window(persister: Arc<SnapshotPersister>, window: Duration) -> Self {
        Self {
            persister,
            window,
            last_sync: DashMap::new(),
            last_prune: Mutex::new(Instant::now()),
            lifecycle: Lifecycle::new(),
            counters: StatsCounters::default(),
        }
    }

    /// Debounce window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of identifiers with a tracked claim
    pub fn tracked(&self) -> usize {
        self.last_sync.len()
    }

    /// Drop claims whose window has passed
    fn prune(&self, now: Instant) {
        {
            let Ok(mut last_prune) = self.last_prune.lock() else {
                return;
            };
            if now.duration_since(*last_prune) < self.window {
                return;
            }
            *last_prune = now;
        }

        let before = self.last_sync.len();
        self.last_sync
            .retain(|_, at| now.duration_since(*at) < self.window);
        trace!(
            evicted = before.saturating_sub(self.last_sync.len()),
            "Expired debounce claims evicted"
        );
    }

    /// Claim the write slot for `persistence_id`
    ///
    /// Returns the claim instant, or `None` when the write falls inside the
    /// window of a previous one. Check and update happen under the map's
    /// entry lock so concurrent callers cannot both claim the slot.
    fn claim(&self, persistence_id: &str, now: Instant) -> Option<Instant> {
        let debouncing = self.lifecycle.is_open();
        match self.last_sync.entry(persistence_id.to_string()) {
            Entry::Occupied(mut entry) => {
                if debouncing && now.duration_since(*entry.get()) < self.window {
                    None
                } else {
                    entry.insert(now);
                    Some(now)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                Some(now)
            }
        }
    }
}

#[async_trait]
impl WriteCoalescer for DebounceCoalescer {
    async fn submit(&self, snapshot: Snapshot) -> Result<()> {
        snapshot.validate()?;
        StatsCounters::bump(&self.counters.accepted);

        let now = Instant::now();
        self.prune(now);

        let Some(claimed_at) = self.claim(&snapshot.persistence_id, now) else {
            StatsCounters::bump(&self.counters.suppressed);
            trace!(
                persistence_id = %snapshot.persistence_id,
                version = snapshot.version,
                "Write suppressed inside debounce window"
            );
            return Ok(());
        };

        match self.persister.persist(&snapshot).await {
            Ok(()) => {
                StatsCounters::bump(&self.counters.flushed);
                Ok(())
            }
            Err(e) => {
                StatsCounters::bump(&self.counters.failed);
                // A failed write must not open a window that hides the retry.
                self.last_sync
                    .remove_if(&snapshot.persistence_id, |_, at| *at == claimed_at);
                Err(e)
            }
        }
    }

    async fn shutdown(&self) -> Result<()> {
        if self.lifecycle.begin_draining() {
            info!("Debounce disabled, subsequent writes are forced through");
        }
        Ok(())
    }

    fn stats(&self) -> CoalescerStats {
        self.counters.snapshot(0)
    }

    fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn strategy_name(&self) -> &str {
        "debounce"
    }
}

impl std::fmt::Debug for DebounceCoalescer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceCoalescer")
            .field("window", &self.window)
            .field("tracked", &self.last_sync.len())
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
