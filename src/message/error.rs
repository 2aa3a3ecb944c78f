//! Error types for the message store.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers. "Not found" is never an error here;
//! lookups return `Option`.

use super::domain::{CollectionNameError, MessageId, ParseMessageIdError};
use std::sync::Arc;
use thiserror::Error;

/// Shared, thread-safe boxed error used for backend failures.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`MessageStore`](super::services::MessageStore)
/// operations.
#[derive(Debug, Clone, Error)]
pub enum MessageStoreError {
    /// The backing database is unreachable, timed out, or the message could
    /// not be encoded for it.
    #[error("message store unavailable: {0}")]
    StoreUnavailable(SharedError),

    /// A stored document lacks required fields or names a payload type this
    /// process cannot resolve.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A stored payload does not have the shape its declared type expects.
    #[error("corrupt payload for type '{type_tag}': {reason}")]
    PayloadCorrupt {
        /// The declared payload type tag.
        type_tag: String,
        /// Description of the decoding failure.
        reason: String,
    },

    /// The caller supplied an unusable argument; no I/O was attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A message with this identifier is already stored.
    #[error("duplicate message: {0}")]
    DuplicateMessage(MessageId),
}

impl MessageStoreError {
    /// Creates a store-unavailable error from any error type.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::StoreUnavailable(Arc::new(err))
    }

    /// Creates a schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch(message.into())
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Returns `true` for [`Self::StoreUnavailable`].
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<ParseMessageIdError> for MessageStoreError {
    fn from(err: ParseMessageIdError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<CodecError> for MessageStoreError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::SchemaMismatch(reason) => Self::SchemaMismatch(reason),
            CodecError::PayloadCorrupt { type_tag, reason } => {
                Self::PayloadCorrupt { type_tag, reason }
            }
            CodecError::Unencodable { source, .. } => Self::StoreUnavailable(source),
        }
    }
}

impl From<DocumentDatabaseError> for MessageStoreError {
    fn from(err: DocumentDatabaseError) -> Self {
        match err {
            // The store only writes canonical message keys, so a clash on
            // anything else is a backend that disagrees with the schema.
            DocumentDatabaseError::DuplicateKey(key) => MessageId::parse(&key).map_or_else(
                |_| {
                    Self::SchemaMismatch(format!(
                        "database reported a duplicate of non-message key '{key}'"
                    ))
                },
                Self::DuplicateMessage,
            ),
            DocumentDatabaseError::Unavailable(source) => Self::StoreUnavailable(source),
            DocumentDatabaseError::Malformed(reason) => Self::SchemaMismatch(reason),
        }
    }
}

/// Errors raised while translating between messages and documents.
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// The document is missing required structure or names an unknown type.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A payload document does not fit its declared type.
    #[error("corrupt payload for type '{type_tag}': {reason}")]
    PayloadCorrupt {
        /// The declared payload type tag.
        type_tag: String,
        /// Description of the decoding failure.
        reason: String,
    },

    /// A typed payload failed to serialise.
    #[error("payload of type '{type_tag}' could not be encoded: {source}")]
    Unencodable {
        /// The payload's type tag.
        type_tag: String,
        /// The underlying serialisation failure.
        source: SharedError,
    },
}

impl CodecError {
    /// Creates a schema mismatch error.
    #[must_use]
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch(message.into())
    }

    /// Creates a corrupt payload error.
    #[must_use]
    pub fn payload_corrupt(type_tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PayloadCorrupt {
            type_tag: type_tag.into(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by a [`DocumentDatabase`](super::ports::DocumentDatabase)
/// implementation.
#[derive(Debug, Clone, Error)]
pub enum DocumentDatabaseError {
    /// A document with this primary key already exists in the collection.
    #[error("duplicate document key: {0}")]
    DuplicateKey(String),

    /// The database could not be reached or the operation failed in transit.
    #[error("database unavailable: {0}")]
    Unavailable(SharedError),

    /// A stored value is not a document.
    #[error("malformed stored document: {0}")]
    Malformed(String),
}

impl DocumentDatabaseError {
    /// Creates an unavailable error from any error type.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Creates an unavailable error from a plain description.
    #[must_use]
    pub fn unavailable_msg(message: impl Into<String>) -> Self {
        Self::Unavailable(Arc::new(BackendFailure(message.into())))
    }
}

/// Plain-text backend failure, used where no richer error value exists.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct BackendFailure(pub String);

/// Errors raised while building a payload type registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The tag is already bound to a different decoder.
    #[error("payload type tag '{0}' is already registered")]
    DuplicateTag(String),

    /// The tag is empty after trimming.
    #[error("payload type tag must not be empty")]
    EmptyTag,
}

/// Errors raised while assembling store configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The collection name is invalid.
    #[error(transparent)]
    Collection(#[from] CollectionNameError),

    /// The operation timeout is zero.
    #[error("operation timeout must be greater than zero")]
    ZeroTimeout,
}
