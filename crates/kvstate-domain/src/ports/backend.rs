//! Key-Value Backend Port
//!
//! The external collaborator that actually holds the items. The contract is
//! deliberately minimal: a full-item put and a point get by partition key.

use crate::error::Result;
use crate::value_objects::Item;
use async_trait::async_trait;

/// Key-value backend interface
///
/// # Implementations
///
/// - **InMemory**: process-local table map for tests and development
/// - **Redis**: items stored as JSON documents under `table:key`
///
/// Implementations report failures as
/// [`Error::BackendUnavailable`](crate::error::Error::BackendUnavailable)
/// and never retry on their own.
#[async_trait]
pub trait KeyValueBackend: Send + Sync + std::fmt::Debug {
    /// Store `item` under `key`, replacing any existing item
    async fn put_item(&self, table: &str, key: &str, item: Item) -> Result<()>;

    /// Fetch the item stored under `key`, `None` when absent
    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>>;

    /// Get the name/identifier of this backend implementation
    fn provider_name(&self) -> &str;
}
