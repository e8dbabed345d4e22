//! Redis key-value backend
//!
//! Stores each item as a JSON document under `"{table}:{key}"`. Binary
//! attributes are base64 encoded inside the document.
//!
//! ## Example
//!
//! ```ignore
//! use kvstate_providers::backend::RedisBackend;
//!
//! let backend = RedisBackend::new("redis://localhost:6379")?;
//! // Or with host/port
//! let backend = RedisBackend::with_host_port("localhost", 6379)?;
//! ```

use async_trait::async_trait;
use kvstate_domain::error::{Error, Result};
use kvstate_domain::ports::KeyValueBackend;
use kvstate_domain::value_objects::Item;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use tracing::trace;

/// Redis key-value backend
///
/// Uses multiplexed connections for efficient connection reuse. The
/// connection URL is never included in error messages.
#[derive(Clone)]
pub struct RedisBackend {
    client: Client,
}

impl RedisBackend {
    /// Create a new Redis backend with a connection URL
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Redis connection URL (e.g., "redis://localhost:6379")
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::configuration_with_source("Failed to create Redis client", e)
        })?;

        Ok(Self { client })
    }

    /// Create a new Redis backend with host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(&format!("redis://{host}:{port}"))
    }

    /// Storage key for an item
    pub fn storage_key(table: &str, key: &str) -> String {
        format!("{table}:{key}")
    }

    async fn get_connection(&self, operation: &str, key: &str) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::backend_with_source(operation, key, e))
    }
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    async fn put_item(&self, table: &str, key: &str, item: Item) -> Result<()> {
        let document = encode_document(key, &item)?;

        let mut conn = self.get_connection("put_item", key).await?;
        conn.set::<_, _, ()>(Self::storage_key(table, key), document)
            .await
            .map_err(|e| Error::backend_with_source("put_item", key, e))?;

        trace!(table, key, "Stored item in Redis");
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>> {
        let mut conn = self.get_connection("get_item", key).await?;

        let document = conn
            .get::<_, Option<String>>(Self::storage_key(table, key))
            .await
            .map_err(|e| Error::backend_with_source("get_item", key, e))?;

        document
            .map(|document| decode_document(key, &document))
            .transpose()
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

fn encode_document(key: &str, item: &Item) -> Result<String> {
    serde_json::to_string(item).map_err(|e| {
        Error::backend_unavailable("put_item", key, format!("Failed to encode item: {e}"))
    })
}

fn decode_document(key: &str, document: &str) -> Result<Item> {
    serde_json::from_str(document)
        .map_err(|e| Error::malformed_attribute(key, "<item>", e.to_string()))
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}
