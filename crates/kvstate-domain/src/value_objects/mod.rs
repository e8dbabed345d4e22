//! Domain Value Objects
//!
//! Immutable value objects that represent concepts in the domain
//! without identity.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Snapshot`] | Latest state of one entity plus version and timestamp |
//! | [`Record`] | Flat storage form of a snapshot |
//! | [`StateValue`] | Type-erased union over registered state messages |
//! | [`AttributeValue`] | Typed attribute of a backend item |
//! | [`LifecycleState`] | `Open → Draining → Closed` phase of a coalescer |

/// Backend item attribute shapes
pub mod item;
/// Coalescer lifecycle state machine
pub mod lifecycle;
/// Storage record
pub mod record;
/// Domain snapshot
pub mod snapshot;
/// Typed state payloads
pub mod state;

// Re-export commonly used value objects
pub use item::{AttributeValue, Item};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use record::Record;
pub use snapshot::{Snapshot, now_nanos};
pub use state::{StateMessage, StateValue};
