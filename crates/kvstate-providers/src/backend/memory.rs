//! In-memory key-value backend
//!
//! Process-local tables backed by `DashMap`. Items are lost when the process
//! exits; use it for tests and local development.

use async_trait::async_trait;
use dashmap::DashMap;
use kvstate_domain::error::Result;
use kvstate_domain::ports::KeyValueBackend;
use kvstate_domain::value_objects::Item;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// In-memory key-value backend
///
/// Clones share the same tables.
///
/// ## Example
///
/// ```rust
/// use kvstate_providers::backend::InMemoryBackend;
///
/// let backend = InMemoryBackend::new();
/// assert_eq!(backend.item_count("states_store"), 0);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    tables: Arc<DashMap<String, DashMap<String, Item>>>,
    puts: Arc<AtomicU64>,
    gets: Arc<AtomicU64>,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of items stored in `table`
    pub fn item_count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |items| items.len())
    }

    /// Total `put_item` calls served
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }

    /// Total `get_item` calls served
    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl KeyValueBackend for InMemoryBackend {
    async fn put_item(&self, table: &str, key: &str, item: Item) -> Result<()> {
        self.puts.fetch_add(1, Ordering::Relaxed);
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), item);
        trace!(table, key, "Stored item");
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &str) -> Result<Option<Item>> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .tables
            .get(table)
            .and_then(|items| items.get(key).map(|item| item.clone())))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("tables", &self.tables.len())
            .field("puts", &self.put_count())
            .field("gets", &self.get_count())
            .finish()
    }
}
