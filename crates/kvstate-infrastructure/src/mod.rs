//! # kvstate infrastructure
//!
//! Turns the domain ports into a working durable state store: the type
//! registry and record codec, the snapshot persister, both write coalescing
//! strategies, the store facade, and the ambient configuration, logging and
//! error helpers.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`codec`] | Type registry and snapshot/record conversion |
//! | [`persister`] | Encode, validate and upsert one snapshot |
//! | [`coalescer`] | Batched and debounce write coalescing |
//! | [`store`] | Host-facing `KeyValueDurableStore` |
//! | [`factory`] | Store assembly from [`config::StoreConfig`] |
//! | [`validation`] | Built-in snapshot validators |
//! | [`config`] | Figment-based configuration |
//! | [`logging`] | Tracing subscriber setup |

pub mod codec;
pub mod coalescer;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod factory;
pub mod logging;
pub mod persister;
pub mod store;
pub mod validation;

pub use codec::{RecordCodec, StateDecoder, TypeRegistry};
pub use coalescer::{
    BatchedCoalescer, BatchedConfig, DebounceCoalescer, FlushReport, QueueFullPolicy,
};
pub use config::{ConfigLoader, StoreConfig};
pub use error_ext::ErrorContext;
pub use factory::StoreFactory;
pub use persister::SnapshotPersister;
pub use store::{Coalescing, KeyValueDurableStore, KeyValueDurableStoreBuilder};
pub use validation::MonotonicVersionValidator;
