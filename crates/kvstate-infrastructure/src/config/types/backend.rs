//! Backend configuration types

use crate::constants::DEFAULT_REDIS_URL;
use serde::{Deserialize, Serialize};

/// Key-value backend implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// Process-local tables
    #[default]
    Memory,
    /// Redis server (requires the `redis` feature)
    Redis,
}

/// Backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend implementation
    pub provider: BackendProvider,

    /// Redis connection URL, used by the Redis backend
    pub redis_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::Memory,
            redis_url: DEFAULT_REDIS_URL.to_string(),
        }
    }
}
