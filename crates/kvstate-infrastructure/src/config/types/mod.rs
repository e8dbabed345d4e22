//! Configuration types

mod backend;
mod coalescing;
mod logging;
mod store;
mod validation;

pub use backend::{BackendConfig, BackendProvider};
pub use coalescing::{CoalescingConfig, CoalescingStrategy, FullQueuePolicy};
pub use logging::LoggingConfig;
pub use store::StoreConfig;
pub use validation::ValidationConfig;
