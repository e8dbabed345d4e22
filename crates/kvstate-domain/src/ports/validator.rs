//! Snapshot Validation Port
//!
//! Optional hook run before a record overwrites the stored one.

use crate::error::Result;
use crate::value_objects::Record;

/// Pre-write validation hook
///
/// When a validator is configured the writer reads the stored record first
/// and passes it here together with the record about to be written.
pub trait SnapshotValidator: Send + Sync + std::fmt::Debug {
    /// Accept or reject `incoming` given the currently stored record
    fn validate(&self, stored: Option<&Record>, incoming: &Record) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
