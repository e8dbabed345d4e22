//! # kvstate domain
//!
//! Core types of the durable state store: snapshots and their storage
//! records, the type-erased state union, the coalescer lifecycle, the port
//! traits implemented by outer layers, and the error type.
//!
//! This crate performs no I/O.

/// Domain constants
pub mod constants;
/// Error handling types
pub mod error;
/// Port traits
pub mod ports;
/// Value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{
    CoalescerStats, DurableStateStore, KeyValueBackend, SnapshotValidator, StateGateway,
    WriteCoalescer,
};
pub use value_objects::{
    AttributeValue, Item, Lifecycle, LifecycleState, Record, Snapshot, StateMessage, StateValue,
};
