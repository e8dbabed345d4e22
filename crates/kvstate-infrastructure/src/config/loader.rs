//! Configuration loader
//!
//! Sources are merged in this order, later ones overriding earlier ones:
//!
//! 1. `StoreConfig::default()`
//! 2. TOML file (explicit path, or `kvstate.toml` in the working directory)
//! 3. Environment variables `KVSTATE__<SECTION>__<KEY>`, e.g.
//!    `KVSTATE__COALESCING__QUEUE_CAPACITY=500`

use crate::config::{BackendProvider, CoalescingStrategy, FullQueuePolicy, StoreConfig};
use crate::constants::{CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_FILENAME};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use kvstate_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Get the configured file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<StoreConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(StoreConfig::default()));

        let path = self
            .config_path
            .clone()
            .or_else(Self::find_default_config_path);
        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                log_config_loaded(&path, true);
            } else {
                log_config_loaded(&path, false);
            }
        }

        let prefix = format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let config: StoreConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_store_config(&config)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &StoreConfig, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(config)
            .config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).config_context("Failed to write config file")?;

        Ok(())
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let candidate = env::current_dir().ok()?.join(DEFAULT_CONFIG_FILENAME);
        candidate.exists().then_some(candidate)
    }
}

/// Validate a store configuration
pub fn validate_store_config(config: &StoreConfig) -> Result<()> {
    if config.table_name.trim().is_empty() {
        return Err(Error::configuration("Table name cannot be empty"));
    }
    validate_backend_config(config)?;
    validate_coalescing_config(config)?;
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_backend_config(config: &StoreConfig) -> Result<()> {
    if config.backend.provider == BackendProvider::Redis && config.backend.redis_url.is_empty() {
        return Err(Error::configuration(
            "Redis URL is required when the redis backend is selected",
        ));
    }
    Ok(())
}

fn validate_coalescing_config(config: &StoreConfig) -> Result<()> {
    let coalescing = &config.coalescing;
    match coalescing.strategy {
        CoalescingStrategy::Batched => {
            if coalescing.queue_capacity == 0 {
                return Err(Error::configuration("Queue capacity cannot be 0"));
            }
            if coalescing.flush_interval_ms == 0 {
                return Err(Error::configuration("Flush interval cannot be 0"));
            }
            if coalescing.full_queue_policy == FullQueuePolicy::Block
                && coalescing.enqueue_timeout_ms == 0
            {
                return Err(Error::configuration(
                    "Enqueue timeout cannot be 0 with the block policy",
                ));
            }
        }
        CoalescingStrategy::Debounce => {
            if coalescing.debounce_window_ms == 0 {
                return Err(Error::configuration("Debounce window cannot be 0"));
            }
        }
    }
    Ok(())
}
