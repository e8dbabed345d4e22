//! Batched write coalescer
//!
//! Snapshots are encoded on submit, so codec failures reach the caller, and
//! the resulting records go into a bounded queue. One background
//! task wakes every flush interval, drains whatever is queued into a
//! last-write-wins map keyed by identifier and upserts each survivor
//! sequentially. Snapshots arriving while a drain runs wait for the next
//! cycle.
//!
//! A full queue wakes the task early. What the submitting caller sees is
//! governed by [`QueueFullPolicy`].
//!
//! Shutdown closes the queue, drains it completely and flushes every
//! remaining snapshot before returning. Identifiers whose latest snapshot
//! was given up on in any cycle, and not written since, are reported by
//! `shutdown` as `FlushIncomplete`. A crash loses at most the snapshots
//! queued since the last cycle.

use super::StatsCounters;
use crate::error_ext::ErrorContext;
use crate::persister::SnapshotPersister;
use async_trait::async_trait;
use kvstate_domain::constants::{
    DEFAULT_ENQUEUE_TIMEOUT, DEFAULT_FLUSH_INTERVAL, DEFAULT_QUEUE_CAPACITY,
};
use kvstate_domain::error::{Error, Result};
use kvstate_domain::ports::{CoalescerStats, WriteCoalescer};
use kvstate_domain::value_objects::{Lifecycle, LifecycleState, Record, Snapshot};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::error::{SendTimeoutError, TrySendError};
use tokio::sync::{Mutex, Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What `submit` does when the queue has no free slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueFullPolicy {
    /// Wait up to `timeout` for space, then fail with `QueueFull`
    Block {
        /// Maximum wait for a free slot
        timeout: Duration,
    },
    /// Fail with `QueueFull` immediately
    Reject,
}

impl Default for QueueFullPolicy {
    fn default() -> Self {
        Self::Block {
            timeout: DEFAULT_ENQUEUE_TIMEOUT,
        }
    }
}

/// Batched coalescer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchedConfig {
    /// Maximum number of queued snapshots
    pub queue_capacity: usize,
    /// Period between flush cycles
    pub flush_interval: Duration,
    /// Behavior when the queue is full
    pub queue_full_policy: QueueFullPolicy,
}

impl Default for BatchedConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            queue_full_policy: QueueFullPolicy::default(),
        }
    }
}

impl BatchedConfig {
    /// Set the queue capacity
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the flush interval
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set the full-queue policy
    pub fn with_queue_full_policy(mut self, policy: QueueFullPolicy) -> Self {
        self.queue_full_policy = policy;
        self
    }
}

/// Outcome of one flush cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Snapshots taken off the queue
    pub drained: usize,
    /// Identifiers written to the backend
    pub written: usize,
    /// Identifiers kept for the next cycle after a transient failure
    pub retained: usize,
    /// Identifiers whose latest snapshot was given up on
    ///
    /// For the final flush this also lists identifiers abandoned by earlier
    /// cycles and not written since.
    pub failed: Vec<String>,
}

struct PendingWrites {
    receiver: mpsc::Receiver<Record>,
    retry: HashMap<String, Record>,
    abandoned: BTreeSet<String>,
}

struct Shared {
    persister: Arc<SnapshotPersister>,
    sender: mpsc::Sender<Record>,
    pending: Mutex<PendingWrites>,
    retained: AtomicU64,
    lifecycle: Lifecycle,
    cancel: CancellationToken,
    flush_wanted: Notify,
    config: BatchedConfig,
    counters: StatsCounters,
}

impl Shared {
    fn merge(&self, batch: &mut HashMap<String, Record>, record: Record) {
        if batch
            .insert(record.persistence_id.clone(), record)
            .is_some()
        {
            StatsCounters::bump(&self.counters.coalesced);
        }
    }

    async fn flush_cycle(&self, final_drain: bool) -> FlushReport {
        let mut pending = self.pending.lock().await;
        let PendingWrites {
            receiver,
            retry,
            abandoned,
        } = &mut *pending;

        // Retained snapshots go in first so anything newer from the queue
        // replaces them.
        let mut batch = std::mem::take(retry);
        let mut report = FlushReport::default();

        if final_drain {
            receiver.close();
            while let Some(record) = receiver.recv().await {
                report.drained += 1;
                self.merge(&mut batch, record);
            }
        } else {
            while let Ok(record) = receiver.try_recv() {
                report.drained += 1;
                self.merge(&mut batch, record);
            }
        }

        for (persistence_id, record) in batch {
            match self.persister.persist_record(&record).await {
                Ok(()) => {
                    abandoned.remove(&persistence_id);
                    report.written += 1;
                    StatsCounters::bump(&self.counters.flushed);
                }
                Err(e) => {
                    StatsCounters::bump(&self.counters.failed);
                    if !final_drain && e.is_transient() {
                        warn!(
                            persistence_id = %persistence_id,
                            version = record.version,
                            error = %e,
                            "Flush failed, snapshot kept for next cycle"
                        );
                        retry.insert(persistence_id, record);
                    } else {
                        warn!(
                            persistence_id = %persistence_id,
                            version = record.version,
                            error = %e,
                            "Flush failed, snapshot dropped"
                        );
                        abandoned.insert(persistence_id.clone());
                        report.failed.push(persistence_id);
                    }
                }
            }
        }

        if final_drain {
            report.failed = abandoned.iter().cloned().collect();
        }
        report.retained = retry.len();
        self.retained
            .store(retry.len() as u64, Ordering::Relaxed);
        report
    }

    fn pending_count(&self) -> u64 {
        let queued = self.sender.max_capacity() - self.sender.capacity();
        queued as u64 + self.retained.load(Ordering::Relaxed)
    }
}

async fn run_flush_loop(shared: Arc<Shared>) -> FlushReport {
    let period = shared.config.flush_interval;
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
            () = shared.flush_wanted.notified() => {}
        }

        let report = shared.flush_cycle(false).await;
        if report.drained > 0 || report.retained > 0 || !report.failed.is_empty() {
            debug!(
                drained = report.drained,
                written = report.written,
                retained = report.retained,
                failed = report.failed.len(),
                "Flush cycle completed"
            );
        }
    }

    let report = shared.flush_cycle(true).await;
    info!(
        drained = report.drained,
        written = report.written,
        failed = report.failed.len(),
        "Final flush completed"
    );
    report
}

/// Queue-and-flush write coalescer
///
/// Must be created inside a tokio runtime; construction spawns the flush
/// task. Dropping the coalescer without calling `shutdown` still triggers
/// the final flush in the background, but nobody observes its outcome.
pub struct BatchedCoalescer {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<FlushReport>>>,
}

impl BatchedCoalescer {
    /// Create the coalescer and start its flush task
    pub fn new(persister: Arc<SnapshotPersister>, config: BatchedConfig) -> Self {
        let config = BatchedConfig {
            queue_capacity: config.queue_capacity.max(1),
            flush_interval: config.flush_interval.max(Duration::from_millis(1)),
            ..config
        };
        let (sender, receiver) = mpsc::channel(config.queue_capacity);

        let shared = Arc::new(Shared {
            persister,
            sender,
            pending: Mutex::new(PendingWrites {
                receiver,
                retry: HashMap::new(),
                abandoned: BTreeSet::new(),
            }),
            retained: AtomicU64::new(0),
            lifecycle: Lifecycle::new(),
            cancel: CancellationToken::new(),
            flush_wanted: Notify::new(),
            config,
            counters: StatsCounters::default(),
        });

        let worker = tokio::spawn(run_flush_loop(Arc::clone(&shared)));
        info!(
            queue_capacity = config.queue_capacity,
            flush_interval_ms = config.flush_interval.as_millis(),
            "Batched write coalescer started"
        );

        Self {
            shared,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Effective settings
    pub fn config(&self) -> &BatchedConfig {
        &self.shared.config
    }

    /// Run a flush cycle now instead of waiting for the next tick
    pub async fn flush(&self) -> FlushReport {
        self.shared.flush_cycle(false).await
    }

    async fn enqueue(&self, record: Record) -> Result<()> {
        let capacity = self.shared.config.queue_capacity;

        let record = match self.shared.sender.try_send(record) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Closed(_)) => return Err(Error::closed("write queue is closed")),
            Err(TrySendError::Full(record)) => record,
        };

        // Full queue: pull the next flush forward.
        self.shared.flush_wanted.notify_one();

        match self.shared.config.queue_full_policy {
            QueueFullPolicy::Reject => {
                warn!(
                    persistence_id = %record.persistence_id,
                    capacity,
                    "Write queue full, snapshot rejected"
                );
                Err(Error::queue_full(capacity))
            }
            QueueFullPolicy::Block { timeout } => {
                match self.shared.sender.send_timeout(record, timeout).await {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(record)) => {
                        warn!(
                            persistence_id = %record.persistence_id,
                            capacity,
                            timeout_ms = timeout.as_millis(),
                            "Write queue still full after timeout, snapshot rejected"
                        );
                        Err(Error::queue_full(capacity))
                    }
                    Err(SendTimeoutError::Closed(_)) => {
                        Err(Error::closed("write queue is closed"))
                    }
                }
            }
        }
    }
}

#[async_trait]
impl WriteCoalescer for BatchedCoalescer {
    async fn submit(&self, snapshot: Snapshot) -> Result<()> {
        snapshot.validate()?;

        if let Err(e) = self.shared.lifecycle.ensure_open() {
            StatsCounters::bump(&self.shared.counters.rejected);
            return Err(e);
        }

        let record = match self.shared.persister.codec().encode(&snapshot) {
            Ok(record) => record,
            Err(e) => {
                StatsCounters::bump(&self.shared.counters.rejected);
                warn!(
                    persistence_id = %snapshot.persistence_id,
                    error = %e,
                    "Snapshot could not be encoded, write aborted"
                );
                return Err(e);
            }
        };

        let result = self.enqueue(record).await;
        match result {
            Ok(()) => StatsCounters::bump(&self.shared.counters.accepted),
            Err(_) => StatsCounters::bump(&self.shared.counters.rejected),
        }
        result
    }

    async fn shutdown(&self) -> Result<()> {
        let mut worker = self.worker.lock().await;
        let Some(handle) = worker.take() else {
            return Ok(());
        };

        self.shared.lifecycle.begin_draining();
        info!(
            pending = self.shared.pending_count(),
            "Draining batched write coalescer"
        );
        self.shared.cancel.cancel();

        let report = handle.await.context("Flush task failed")?;
        self.shared.lifecycle.close();

        if report.failed.is_empty() {
            Ok(())
        } else {
            Err(Error::flush_incomplete(report.failed))
        }
    }

    fn stats(&self) -> CoalescerStats {
        self.shared
            .counters
            .snapshot(self.shared.pending_count())
    }

    fn lifecycle_state(&self) -> LifecycleState {
        self.shared.lifecycle.state()
    }

    fn strategy_name(&self) -> &str {
        "batched"
    }
}

impl Drop for BatchedCoalescer {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl std::fmt::Debug for BatchedCoalescer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchedCoalescer")
            .field("config", &self.shared.config)
            .field("state", &self.shared.lifecycle.state())
            .field("pending", &self.shared.pending_count())
            .finish()
    }
}
