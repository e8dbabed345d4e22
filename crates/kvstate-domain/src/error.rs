//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error carried by context-wrapping variants
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for the durable state store
#[derive(Error, Debug)]
pub enum Error {
    /// The key-value backend rejected or failed a request
    #[error("Backend unavailable during {operation} for '{persistence_id}': {message}")]
    BackendUnavailable {
        /// Gateway operation that failed (`upsert`, `get`)
        operation: String,
        /// Identifier the operation targeted
        persistence_id: String,
        /// Description of the backend failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// A state payload could not be serialized; nothing was persisted
    #[error(
        "Serialization error for type '{type_tag}'{}: {message}",
        for_identifier(.persistence_id.as_deref())
    )]
    Serialization {
        /// Type tag of the payload being encoded
        type_tag: String,
        /// Identifier of the snapshot, when known
        persistence_id: Option<String>,
        /// Description of the serialization failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// The stored type tag is not present in the type registry
    #[error(
        "Unknown state type{}: '{type_tag}' is not registered",
        for_identifier(.persistence_id.as_deref())
    )]
    UnknownType {
        /// Unresolvable type tag
        type_tag: String,
        /// Identifier of the stored record, when known
        persistence_id: Option<String>,
    },

    /// Stored payload bytes could not be decoded into the registered type
    #[error(
        "Decode error for type '{type_tag}'{}: {message}",
        for_identifier(.persistence_id.as_deref())
    )]
    Decode {
        /// Type tag of the payload being decoded
        type_tag: String,
        /// Identifier of the stored record, when known
        persistence_id: Option<String>,
        /// Description of the decode failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// A decoded value is not the expected wrapped type
    #[error(
        "Failed to unpack state{}: expected '{expected}', found '{actual}'",
        for_identifier(.persistence_id.as_deref())
    )]
    Unpack {
        /// Type the caller asked for
        expected: String,
        /// Type actually held by the value
        actual: String,
        /// Identifier of the stored record, when known
        persistence_id: Option<String>,
    },

    /// A stored item attribute is missing or has the wrong shape
    #[error("Malformed attribute '{attribute}' for '{persistence_id}': {message}")]
    MalformedAttribute {
        /// Identifier of the corrupt item
        persistence_id: String,
        /// Attribute name
        attribute: String,
        /// Description of the problem
        message: String,
    },

    /// The store no longer accepts writes
    #[error("Store is closed: {message}")]
    Closed {
        /// Lifecycle detail
        message: String,
    },

    /// The pending write queue had no capacity
    #[error("Write queue is full (capacity {capacity})")]
    QueueFull {
        /// Configured queue capacity
        capacity: usize,
    },

    /// The incoming snapshot is older than the stored one
    #[error("Stale version for '{persistence_id}': stored {stored}, incoming {incoming}")]
    StaleVersion {
        /// Identifier of the rejected write
        persistence_id: String,
        /// Version currently stored
        stored: u64,
        /// Version that was rejected
        incoming: u64,
    },

    /// The final flush could not persist every pending snapshot
    #[error("Flush incomplete: {} snapshot(s) not persisted: {}", failed.len(), failed.join(", "))]
    FlushIncomplete {
        /// Identifiers whose latest snapshot was not persisted
        failed: Vec<String>,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Gateway error creation methods
impl Error {
    /// Create a backend error without a source
    pub fn backend_unavailable<O, I, M>(operation: O, persistence_id: I, message: M) -> Self
    where
        O: Into<String>,
        I: Into<String>,
        M: Into<String>,
    {
        Self::BackendUnavailable {
            operation: operation.into(),
            persistence_id: persistence_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a backend error wrapping the client's error
    pub fn backend_with_source<O, I, E>(operation: O, persistence_id: I, source: E) -> Self
    where
        O: Into<String>,
        I: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BackendUnavailable {
            operation: operation.into(),
            persistence_id: persistence_id.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a malformed attribute error
    pub fn malformed_attribute<I, A, M>(persistence_id: I, attribute: A, message: M) -> Self
    where
        I: Into<String>,
        A: Into<String>,
        M: Into<String>,
    {
        Self::MalformedAttribute {
            persistence_id: persistence_id.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

// Codec error creation methods
impl Error {
    /// Create a serialization error
    pub fn serialization<T: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        type_tag: T,
        source: E,
    ) -> Self {
        Self::Serialization {
            type_tag: type_tag.into(),
            persistence_id: None,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type<T: Into<String>>(type_tag: T) -> Self {
        Self::UnknownType {
            type_tag: type_tag.into(),
            persistence_id: None,
        }
    }

    /// Create a decode error
    pub fn decode<T: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        type_tag: T,
        source: E,
    ) -> Self {
        Self::Decode {
            type_tag: type_tag.into(),
            persistence_id: None,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unpack error
    pub fn unpack<E: Into<String>, A: Into<String>>(expected: E, actual: A) -> Self {
        Self::Unpack {
            expected: expected.into(),
            actual: actual.into(),
            persistence_id: None,
        }
    }

    /// Attach the snapshot identifier to a codec error
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn with_persistence_id<I: Into<String>>(mut self, id: I) -> Self {
        if let Self::Serialization { persistence_id, .. }
        | Self::UnknownType { persistence_id, .. }
        | Self::Decode { persistence_id, .. }
        | Self::Unpack { persistence_id, .. } = &mut self
        {
            *persistence_id = Some(id.into());
        }
        self
    }
}

fn for_identifier(persistence_id: Option<&str>) -> String {
    persistence_id
        .map(|id| format!(" for '{id}'"))
        .unwrap_or_default()
}

// Lifecycle and coalescing error creation methods
impl Error {
    /// Create a closed error
    pub fn closed<S: Into<String>>(message: S) -> Self {
        Self::Closed {
            message: message.into(),
        }
    }

    /// Create a queue full error
    pub fn queue_full(capacity: usize) -> Self {
        Self::QueueFull { capacity }
    }

    /// Create a stale version error
    pub fn stale_version<I: Into<String>>(persistence_id: I, stored: u64, incoming: u64) -> Self {
        Self::StaleVersion {
            persistence_id: persistence_id.into(),
            stored,
            incoming,
        }
    }

    /// Create a flush incomplete error
    pub fn flush_incomplete(failed: Vec<String>) -> Self {
        Self::FlushIncomplete { failed }
    }
}

// Basic error creation methods
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl Error {
    /// Whether a later retry of the same operation could succeed
    ///
    /// Backend failures and full queues are transient; codec and
    /// validation failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. } | Self::QueueFull { .. })
    }
}
