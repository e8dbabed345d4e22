//! Validation configuration types

use serde::{Deserialize, Serialize};

/// Pre-write validation configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject writes whose version is lower than the stored one
    pub monotonic_version: bool,
}
