//! Typed State Payloads
//!
//! A snapshot's state is a tagged union over every message type the host
//! registered. [`StateMessage`] marks a concrete payload type and names its
//! type tag; [`StateValue`] is the type-erased union value that travels
//! through the store and can be unpacked back into the concrete type.
//!
//! Payload bytes are JSON produced by `serde_json`.

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A concrete state payload type that can be persisted
///
/// # Example
///
/// ```rust
/// use kvstate_domain::value_objects::{StateMessage, StateValue};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Account {
///     balance: i64,
/// }
///
/// impl StateMessage for Account {
///     const TYPE_TAG: &'static str = "bank.Account";
/// }
///
/// let value = StateValue::pack(Account { balance: 10 });
/// assert_eq!(value.type_tag(), "bank.Account");
/// assert_eq!(value.unpack::<Account>().unwrap().balance, 10);
/// ```
pub trait StateMessage:
    Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Globally unique, fully-qualified name of the payload type
    const TYPE_TAG: &'static str;
}

pub(crate) trait ErasedState: Send + Sync + fmt::Debug {
    fn type_tag(&self) -> &'static str;
    fn to_bytes(&self) -> Result<Vec<u8>>;
    fn as_any(&self) -> &dyn Any;
    fn eq_erased(&self, other: &dyn ErasedState) -> bool;
}

impl<T: StateMessage> ErasedState for T {
    fn type_tag(&self) -> &'static str {
        T::TYPE_TAG
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::serialization(T::TYPE_TAG, e))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedState) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }
}

/// Type-erased state value
///
/// Cheap to clone; the payload is shared behind an `Arc`. Two values are
/// equal when they hold the same concrete type with equal contents.
#[derive(Clone)]
pub struct StateValue {
    inner: Arc<dyn ErasedState>,
}

impl StateValue {
    /// Wrap a concrete message
    pub fn pack<T: StateMessage>(message: T) -> Self {
        Self {
            inner: Arc::new(message),
        }
    }

    /// Decode JSON payload bytes as `T` and wrap the result
    pub fn decode<T: StateMessage>(bytes: &[u8]) -> Result<Self> {
        let message: T = serde_json::from_slice(bytes).map_err(|e| Error::decode(T::TYPE_TAG, e))?;
        Ok(Self::pack(message))
    }

    /// Type tag of the held message
    pub fn type_tag(&self) -> &str {
        self.inner.type_tag()
    }

    /// Serialize the held message to payload bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.inner.to_bytes()
    }

    /// Whether the held message is a `T`
    pub fn is<T: StateMessage>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    /// Borrow the held message as `T`
    pub fn downcast_ref<T: StateMessage>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Extract a copy of the held message as `T`
    pub fn unpack<T: StateMessage>(&self) -> Result<T> {
        self.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| Error::unpack(T::TYPE_TAG, self.type_tag()))
    }
}

impl PartialEq for StateValue {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_erased(other.inner.as_ref())
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateValue")
            .field("type_tag", &self.type_tag())
            .field("value", &self.inner)
            .finish()
    }
}
