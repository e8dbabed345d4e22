//! Durable State Store Port
//!
//! The contract the host runtime programs against.

use crate::error::Result;
use crate::value_objects::Snapshot;
use async_trait::async_trait;

/// Durable state store interface
///
/// # Example
///
/// ```ignore
/// store.connect().await?;
/// store.write_state(Snapshot::new("account_1", account).with_version(3)).await?;
///
/// if let Some(snapshot) = store.get_latest_state("account_1").await? {
///     let account: Account = snapshot.state.unpack()?;
/// }
///
/// store.shutdown().await?;
/// ```
#[async_trait]
pub trait DurableStateStore: Send + Sync {
    /// Prepare the store for use
    async fn connect(&self) -> Result<()>;

    /// Release the store's connection resources
    async fn disconnect(&self) -> Result<()>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<()>;

    /// Persist the latest state for `snapshot.persistence_id`
    async fn write_state(&self, snapshot: Snapshot) -> Result<()>;

    /// Fetch the latest state, `None` when nothing was ever written
    async fn get_latest_state(&self, persistence_id: &str) -> Result<Option<Snapshot>>;

    /// Flush pending writes and stop accepting new ones
    async fn shutdown(&self) -> Result<()>;
}
