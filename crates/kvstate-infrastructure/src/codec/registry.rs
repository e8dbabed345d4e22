//! State type registry
//!
//! Resolves a stored type tag to the decoder that rebuilds the typed state.

use kvstate_domain::error::{Error, Result};
use kvstate_domain::value_objects::{StateMessage, StateValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Decoder turning payload bytes into a packed state value
pub type StateDecoder = Arc<dyn Fn(&[u8]) -> Result<StateValue> + Send + Sync>;

/// Registry of known state message types
///
/// # Example
///
/// ```ignore
/// let registry = TypeRegistry::new()
///     .with::<Account>()
///     .with::<Cart>();
///
/// let value = registry.decode("bank.Account", &bytes)?;
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistry {
    decoders: HashMap<String, StateDecoder>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its type tag
    pub fn register<T: StateMessage>(&mut self) -> &mut Self {
        self.decoders
            .insert(T::TYPE_TAG.to_string(), Arc::new(StateValue::decode::<T>));
        self
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<T: StateMessage>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Register a custom decoder for `type_tag`
    ///
    /// The decoder must produce a value tagged `type_tag`; anything else is
    /// rejected at decode time with `Unpack`.
    pub fn register_decoder<S, F>(&mut self, type_tag: S, decoder: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn(&[u8]) -> Result<StateValue> + Send + Sync + 'static,
    {
        self.decoders.insert(type_tag.into(), Arc::new(decoder));
        self
    }

    /// Whether `type_tag` is registered
    pub fn contains(&self, type_tag: &str) -> bool {
        self.decoders.contains_key(type_tag)
    }

    /// Registered type tags, sorted
    pub fn type_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no type is registered
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Rebuild the state stored under `type_tag`
    pub fn decode(&self, type_tag: &str, payload: &[u8]) -> Result<StateValue> {
        let decoder = self
            .decoders
            .get(type_tag)
            .ok_or_else(|| Error::unknown_type(type_tag))?;

        let value = decoder(payload)?;
        if value.type_tag() != type_tag {
            return Err(Error::unpack(type_tag, value.type_tag()));
        }
        Ok(value)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_tags())
            .finish()
    }
}
