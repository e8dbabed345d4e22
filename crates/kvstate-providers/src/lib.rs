//! # kvstate - Provider Implementations
//!
//! Implementations of the backend and gateway ports defined in
//! `kvstate-domain`.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Backend | `KeyValueBackend` | InMemory, Redis |
//! | Gateway | `StateGateway` | TableGateway |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! kvstate-providers = { version = "0.1", features = ["backend-redis"] }
//! ```

// Re-export kvstate-domain types commonly used with providers
pub use kvstate_domain::error::{Error, Result};
pub use kvstate_domain::ports::{KeyValueBackend, StateGateway};

/// Key-value backend implementations
pub mod backend;

/// Record gateway implementations
pub mod gateway;

pub use gateway::TableGateway;
