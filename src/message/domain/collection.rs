//! Validated collection name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum length for a collection name, matching the `VARCHAR(100)` column.
const MAX_NAME_LENGTH: usize = 100;

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION_NAME: &str = "messages";

/// Name of the document collection that holds stored messages.
///
/// Names are trimmed and must consist of ASCII alphanumerics, `_`, `-` or `.`.
///
/// # Examples
///
/// ```
/// use missive::message::domain::CollectionName;
///
/// let name = CollectionName::new(" audit_messages ").expect("valid name");
/// assert_eq!(name.as_str(), "audit_messages");
/// assert_eq!(CollectionName::default().as_str(), "messages");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Creates a validated collection name.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionNameError::Empty`] when the value is empty after
    /// trimming, [`CollectionNameError::TooLong`] when it exceeds 100
    /// characters, or [`CollectionNameError::InvalidCharacters`] when it
    /// contains anything outside `[A-Za-z0-9_.-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, CollectionNameError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CollectionNameError::Empty);
        }

        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(CollectionNameError::TooLong(raw));
        }

        let is_valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if !is_valid {
            return Err(CollectionNameError::InvalidCharacters(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the collection name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CollectionName {
    fn default() -> Self {
        Self(DEFAULT_COLLECTION_NAME.to_owned())
    }
}

impl TryFrom<String> for CollectionName {
    type Error = CollectionNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors returned while validating a collection name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollectionNameError {
    /// The name is empty after trimming.
    #[error("collection name must not be empty")]
    Empty,

    /// The name exceeds the 100-character storage limit.
    #[error("collection name exceeds 100 character limit: {0}")]
    TooLong(String),

    /// The name contains characters outside `[A-Za-z0-9_.-]`.
    #[error("collection name '{0}' contains invalid characters")]
    InvalidCharacters(String),
}
