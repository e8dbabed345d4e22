//! Domain Port Interfaces
//!
//! Defines the boundary contracts between the domain and the outer layers.
//! High-level modules (domain) define interfaces; providers and
//! infrastructure implement them.
//!
//! ## Organization
//!
//! - **backend** - external key-value backend
//! - **gateway** - record-level persistence over a backend
//! - **coalescer** - write coalescing strategies
//! - **validator** - pre-write validation hook
//! - **store** - host-facing durable state store

/// External key-value backend port
pub mod backend;
/// Write coalescer port
pub mod coalescer;
/// Record gateway port
pub mod gateway;
/// Host-facing store port
pub mod store;
/// Validation hook port
pub mod validator;

// Re-export commonly used port traits for convenience
pub use backend::KeyValueBackend;
pub use coalescer::{CoalescerStats, WriteCoalescer};
pub use gateway::StateGateway;
pub use store::DurableStateStore;
pub use validator::SnapshotValidator;
