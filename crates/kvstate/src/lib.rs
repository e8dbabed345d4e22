//! # kvstate
//!
//! Durable state persistence for actor-style runtimes: the latest snapshot
//! of each entity is stored as one item in a key-value table, and bursts of
//! updates to the same entity are coalesced before they reach the backend.
//!
//! ## Example
//!
//! ```ignore
//! use kvstate::{DurableStateStore, Snapshot, StateMessage, StoreConfig, StoreFactory, TypeRegistry};
//!
//! #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
//! struct Account {
//!     balance: i64,
//! }
//!
//! impl StateMessage for Account {
//!     const TYPE_TAG: &'static str = "bank.Account";
//! }
//!
//! let registry = TypeRegistry::new().with::<Account>();
//! let store = StoreFactory::from_config(&StoreConfig::default(), registry)?;
//!
//! store
//!     .write_state(Snapshot::new("account_1", Account { balance: 10 }).with_version(1))
//!     .await?;
//! store.shutdown().await?;
//!
//! let latest = store.get_latest_state("account_1").await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - snapshots, records, ports and errors
//! - `providers` - key-value backends and the table gateway
//! - `infrastructure` - codec, coalescers, store facade, config and logging

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use kvstate_domain::*;
}

/// Provider layer - backends and gateway
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use kvstate_providers::*;
}

/// Infrastructure layer - store, coalescers, config and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use kvstate_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the store entry points
pub use infrastructure::{
    BatchedConfig, Coalescing, ConfigLoader, KeyValueDurableStore, MonotonicVersionValidator,
    QueueFullPolicy, StoreConfig, StoreFactory, TypeRegistry,
};
pub use providers::TableGateway;
pub use providers::backend::InMemoryBackend;
