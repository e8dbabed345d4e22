//! Key-Value Backend Implementations
//!
//! ## Available Backends
//!
//! | Backend | Type | Description |
//! |---------|------|-------------|
//! | [`InMemoryBackend`] | Local | Process-local tables (tests, development) |
//! | [`RedisBackend`] | Distributed | Redis documents keyed by `table:key` |

#[cfg(feature = "backend-memory")]
pub mod memory;
#[cfg(feature = "backend-redis")]
pub mod redis;

// Re-export for convenience
#[cfg(feature = "backend-memory")]
pub use memory::InMemoryBackend;
#[cfg(feature = "backend-redis")]
pub use redis::RedisBackend;
