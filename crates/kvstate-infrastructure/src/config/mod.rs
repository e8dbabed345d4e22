//! Configuration management
//!
//! Store settings are loaded by [`loader::ConfigLoader`] from defaults, an
//! optional TOML file and `KVSTATE__*` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    BackendConfig, BackendProvider, CoalescingConfig, CoalescingStrategy, FullQueuePolicy,
    LoggingConfig, StoreConfig, ValidationConfig,
};
