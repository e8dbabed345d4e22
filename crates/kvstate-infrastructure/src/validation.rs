//! Built-in snapshot validators

use kvstate_domain::error::{Error, Result};
use kvstate_domain::ports::SnapshotValidator;
use kvstate_domain::value_objects::Record;

/// Rejects writes whose version is lower than the stored version
///
/// Equal versions are accepted so rewriting the same snapshot stays
/// idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicVersionValidator;

impl MonotonicVersionValidator {
    /// Create the validator
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotValidator for MonotonicVersionValidator {
    fn validate(&self, stored: Option<&Record>, incoming: &Record) -> Result<()> {
        match stored {
            Some(stored) if incoming.version < stored.version => Err(Error::stale_version(
                &incoming.persistence_id,
                stored.version,
                incoming.version,
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "monotonic-version"
    }
}
