//! Infrastructure layer constants
//!
//! Timing and capacity defaults of the coalescers live in
//! `kvstate_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "kvstate.toml";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "KVSTATE";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// STORE CONSTANTS
// ============================================================================

/// Default backend table name
pub const DEFAULT_TABLE_NAME: &str = "states_store";

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "KVSTATE_LOG";
