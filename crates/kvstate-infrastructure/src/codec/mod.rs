//! Payload codec
//!
//! Type registry and the snapshot/record converter built on it.

pub mod record;
pub mod registry;

pub use record::RecordCodec;
pub use registry::{StateDecoder, TypeRegistry};
