//! Backend Item Shapes
//!
//! Key-value backends store an item as a map of named, typed attributes.
//! Numbers travel as decimal strings, binary as raw bytes, everything else
//! as UTF-8 strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// A backend item: attribute name to attribute value
pub type Item = BTreeMap<String, AttributeValue>;

/// A single typed attribute value
///
/// Serialized in the externally tagged form `{"S": "..."}`, `{"N": "42"}`,
/// `{"B": "<base64>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// UTF-8 string
    S(String),
    /// Number encoded as a decimal string
    N(String),
    /// Raw bytes
    B(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl AttributeValue {
    /// Encode a number attribute
    pub fn number<T: Display>(value: T) -> Self {
        Self::N(value.to_string())
    }

    /// Borrow a string attribute
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the decimal text of a number attribute
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow a binary attribute
    pub fn as_b(&self) -> Option<&[u8]> {
        match self {
            Self::B(value) => Some(value),
            _ => None,
        }
    }

    /// Short type descriptor, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
        }
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
