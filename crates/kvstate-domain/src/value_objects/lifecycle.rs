//! Store Lifecycle State Machine
//!
//! `Open → Draining → Closed`. Transitions only move forward and are
//! performed with compare-and-swap so the write path and the background
//! flush task observe a single consistent state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase of a write coalescer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Accepting writes normally
    Open,
    /// Shutdown has begun; pending writes are being flushed
    Draining,
    /// Shutdown finished
    Closed,
}

impl LifecycleState {
    fn as_u8(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Draining => 1,
            Self::Closed => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Open,
            1 => Self::Draining,
            _ => Self::Closed,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Draining => "draining",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Atomic lifecycle cell
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Create a lifecycle in the `Open` state
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Open.as_u8()),
        }
    }

    /// Current state
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether writes are accepted normally
    pub fn is_open(&self) -> bool {
        self.state() == LifecycleState::Open
    }

    /// Move `Open → Draining`
    ///
    /// Returns `true` for the caller that performed the transition; every
    /// other caller gets `false`.
    pub fn begin_draining(&self) -> bool {
        self.state
            .compare_exchange(
                LifecycleState::Open.as_u8(),
                LifecycleState::Draining.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Move to `Closed` from any state
    pub fn close(&self) {
        self.state
            .store(LifecycleState::Closed.as_u8(), Ordering::Release);
    }

    /// Fail with [`Error::Closed`] unless the state is `Open`
    pub fn ensure_open(&self) -> Result<()> {
        match self.state() {
            LifecycleState::Open => Ok(()),
            state => Err(Error::closed(format!("store is {state}"))),
        }
    }
}
