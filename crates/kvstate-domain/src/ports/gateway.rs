//! State Gateway Port
//!
//! Record-level contract over a key-value backend.

use crate::error::Result;
use crate::value_objects::Record;
use async_trait::async_trait;

/// Record persistence interface
#[async_trait]
pub trait StateGateway: Send + Sync + std::fmt::Debug {
    /// Overwrite every field of the record stored for `record.persistence_id`
    async fn upsert(&self, record: &Record) -> Result<()>;

    /// Fetch the record for `persistence_id`
    ///
    /// An absent record is `Ok(None)`, never an error.
    async fn get(&self, persistence_id: &str) -> Result<Option<Record>>;
}
