//! Root store configuration

use super::{BackendConfig, CoalescingConfig, LoggingConfig, ValidationConfig};
use crate::constants::DEFAULT_TABLE_NAME;
use serde::{Deserialize, Serialize};

/// Durable state store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend table holding the state items
    pub table_name: String,

    /// Key-value backend selection
    pub backend: BackendConfig,

    /// Write coalescing
    pub coalescing: CoalescingConfig,

    /// Pre-write validation
    pub validation: ValidationConfig,

    /// Logging
    pub logging: LoggingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            backend: BackendConfig::default(),
            coalescing: CoalescingConfig::default(),
            validation: ValidationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
