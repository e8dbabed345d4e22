//! Store factory
//!
//! Resolves a [`StoreConfig`] into a wired [`KeyValueDurableStore`]:
//! backend, table gateway, validator and coalescer.

use crate::codec::TypeRegistry;
use crate::config::loader::validate_store_config;
use crate::config::{
    BackendConfig, BackendProvider, CoalescingConfig, CoalescingStrategy, StoreConfig,
};
use crate::store::{Coalescing, KeyValueDurableStore};
use crate::validation::MonotonicVersionValidator;
use kvstate_domain::error::Result;
use kvstate_domain::ports::{KeyValueBackend, SnapshotValidator, StateGateway};
use kvstate_providers::TableGateway;
use kvstate_providers::backend::InMemoryBackend;
use std::sync::Arc;
use tracing::info;

/// Builds stores and their parts from configuration
pub struct StoreFactory;

impl StoreFactory {
    /// Create the configured key-value backend
    pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn KeyValueBackend>> {
        match config.provider {
            BackendProvider::Memory => {
                let backend: Arc<dyn KeyValueBackend> = InMemoryBackend::new_shared();
                Ok(backend)
            }
            BackendProvider::Redis => Self::create_redis_backend(&config.redis_url),
        }
    }

    #[cfg(feature = "redis")]
    fn create_redis_backend(url: &str) -> Result<Arc<dyn KeyValueBackend>> {
        let backend = kvstate_providers::backend::RedisBackend::new(url)?;
        Ok(Arc::new(backend))
    }

    #[cfg(not(feature = "redis"))]
    fn create_redis_backend(_url: &str) -> Result<Arc<dyn KeyValueBackend>> {
        Err(kvstate_domain::error::Error::configuration(
            "Redis backend requested but the `redis` feature is not enabled",
        ))
    }

    /// Create the configured validator, if any
    pub fn create_validator(config: &StoreConfig) -> Option<Arc<dyn SnapshotValidator>> {
        config
            .validation
            .monotonic_version
            .then(|| Arc::new(MonotonicVersionValidator::new()) as Arc<dyn SnapshotValidator>)
    }

    /// Translate coalescing settings into a strategy
    pub fn coalescing(config: &CoalescingConfig) -> Coalescing {
        match config.strategy {
            CoalescingStrategy::Batched => Coalescing::Batched(config.to_batched_config()),
            CoalescingStrategy::Debounce => Coalescing::Debounce {
                window: config.debounce_window(),
            },
        }
    }

    /// Build a store on an existing backend
    ///
    /// Must run inside a tokio runtime.
    pub fn with_backend(
        config: &StoreConfig,
        backend: Arc<dyn KeyValueBackend>,
        registry: TypeRegistry,
    ) -> Result<KeyValueDurableStore> {
        validate_store_config(config)?;

        let provider = backend.provider_name().to_string();
        let gateway: Arc<dyn StateGateway> =
            Arc::new(TableGateway::new(config.table_name.clone(), backend));

        let mut builder = KeyValueDurableStore::builder(gateway)
            .registry(registry)
            .coalescing(Self::coalescing(&config.coalescing));
        if let Some(validator) = Self::create_validator(config) {
            builder = builder.validator(validator);
        }

        info!(
            table = %config.table_name,
            backend = %provider,
            strategy = ?config.coalescing.strategy,
            monotonic_version = config.validation.monotonic_version,
            "Durable state store created"
        );
        Ok(builder.build())
    }

    /// Build a store entirely from configuration
    ///
    /// Must run inside a tokio runtime.
    pub fn from_config(
        config: &StoreConfig,
        registry: TypeRegistry,
    ) -> Result<KeyValueDurableStore> {
        let backend = Self::create_backend(&config.backend)?;
        Self::with_backend(config, backend, registry)
    }
}
