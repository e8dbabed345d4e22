//! Key-value durable state store
//!
//! Host-facing facade: lifecycle calls, writes through the configured
//! coalescer, reads straight from the gateway.
//!
//! ## Example
//!
//! ```ignore
//! use kvstate_infrastructure::codec::TypeRegistry;
//! use kvstate_infrastructure::store::KeyValueDurableStore;
//! use kvstate_providers::backend::InMemoryBackend;
//! use kvstate_providers::TableGateway;
//!
//! let gateway = TableGateway::new("states_store", InMemoryBackend::new_shared());
//! let store = KeyValueDurableStore::builder(Arc::new(gateway))
//!     .registry(TypeRegistry::new().with::<Account>())
//!     .build();
//!
//! store.write_state(Snapshot::new("account_1", account)).await?;
//! store.shutdown().await?;
//! ```

use crate::codec::{RecordCodec, TypeRegistry};
use crate::coalescer::{BatchedCoalescer, BatchedConfig, DebounceCoalescer};
use crate::persister::SnapshotPersister;
use async_trait::async_trait;
use kvstate_domain::error::{Error, Result};
use kvstate_domain::ports::{
    CoalescerStats, DurableStateStore, SnapshotValidator, StateGateway, WriteCoalescer,
};
use kvstate_domain::value_objects::Snapshot;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Coalescing strategy selected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coalescing {
    /// Queue and flush periodically (default)
    Batched(BatchedConfig),
    /// Synchronous writes, one per identifier per window
    Debounce {
        /// Debounce window
        window: Duration,
    },
}

impl Default for Coalescing {
    fn default() -> Self {
        Self::Batched(BatchedConfig::default())
    }
}

/// Durable state store over a record gateway
#[derive(Debug, Clone)]
pub struct KeyValueDurableStore {
    persister: Arc<SnapshotPersister>,
    coalescer: Arc<dyn WriteCoalescer>,
}

impl KeyValueDurableStore {
    /// Assemble a store from its parts
    pub fn new(persister: Arc<SnapshotPersister>, coalescer: Arc<dyn WriteCoalescer>) -> Self {
        Self {
            persister,
            coalescer,
        }
    }

    /// Start building a store on `gateway`
    pub fn builder(gateway: Arc<dyn StateGateway>) -> KeyValueDurableStoreBuilder {
        KeyValueDurableStoreBuilder::new(gateway)
    }

    /// Coalescer in use
    pub fn coalescer(&self) -> &Arc<dyn WriteCoalescer> {
        &self.coalescer
    }

    /// Coalescer statistics
    pub fn stats(&self) -> CoalescerStats {
        self.coalescer.stats()
    }
}

#[async_trait]
impl DurableStateStore for KeyValueDurableStore {
    async fn connect(&self) -> Result<()> {
        // Backend clients are stateless per call.
        debug!(strategy = self.coalescer.strategy_name(), "Store connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        debug!("Store disconnected");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn write_state(&self, snapshot: Snapshot) -> Result<()> {
        self.coalescer.submit(snapshot).await
    }

    async fn get_latest_state(&self, persistence_id: &str) -> Result<Option<Snapshot>> {
        if persistence_id.trim().is_empty() {
            return Err(Error::invalid_argument("persistence_id cannot be empty"));
        }
        self.persister.load(persistence_id).await
    }

    async fn shutdown(&self) -> Result<()> {
        info!(
            strategy = self.coalescer.strategy_name(),
            "Shutting down durable state store"
        );
        self.coalescer.shutdown().await
    }
}

/// Builder for [`KeyValueDurableStore`]
pub struct KeyValueDurableStoreBuilder {
    gateway: Arc<dyn StateGateway>,
    registry: TypeRegistry,
    coalescing: Coalescing,
    validator: Option<Arc<dyn SnapshotValidator>>,
}

impl KeyValueDurableStoreBuilder {
    /// Start with an empty registry and batched coalescing
    pub fn new(gateway: Arc<dyn StateGateway>) -> Self {
        Self {
            gateway,
            registry: TypeRegistry::new(),
            coalescing: Coalescing::default(),
            validator: None,
        }
    }

    /// Types that reads can reconstruct
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Coalescing strategy
    pub fn coalescing(mut self, coalescing: Coalescing) -> Self {
        self.coalescing = coalescing;
        self
    }

    /// Pre-write validation hook
    pub fn validator(mut self, validator: Arc<dyn SnapshotValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Build the store
    ///
    /// Batched coalescing spawns its flush task, so this must run inside a
    /// tokio runtime.
    pub fn build(self) -> KeyValueDurableStore {
        let codec = RecordCodec::new(Arc::new(self.registry));
        let mut persister = SnapshotPersister::new(codec, self.gateway);
        if let Some(validator) = self.validator {
            persister = persister.with_validator(validator);
        }
        let persister = Arc::new(persister);

        let coalescer: Arc<dyn WriteCoalescer> = match self.coalescing {
            Coalescing::Batched(config) => {
                Arc::new(BatchedCoalescer::new(Arc::clone(&persister), config))
            }
            Coalescing::Debounce { window } => Arc::new(DebounceCoalescer::with_window(
                Arc::clone(&persister),
                window,
            )),
        };

        KeyValueDurableStore::new(persister, coalescer)
    }
}
