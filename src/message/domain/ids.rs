//! Identifier and ordering newtypes for stored messages.
//!
//! [`MessageId`] wraps a UUID so message identity cannot be confused with
//! other UUID-valued fields, and [`Timestamp`] pins the creation instant to the
//! integer epoch-millisecond form the persisted document uses.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique 128-bit identifier for a message.
///
/// The canonical string form is the lowercase hyphenated UUID, which is what
/// the store writes to the `_id` primary-key field.
///
/// # Examples
///
/// ```
/// use missive::message::domain::MessageId;
///
/// let id = MessageId::new();
/// assert!(!id.as_ref().is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random message identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a message identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses the canonical string form of an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParseMessageIdError::Malformed`] when the input is not the
    /// lowercase hyphenated form of a UUID, and [`ParseMessageIdError::Nil`]
    /// when it is the nil UUID. Braced, simple, URN, uppercase and padded
    /// spellings are all rejected, so every accepted key names one document.
    ///
    /// # Examples
    ///
    /// ```
    /// use missive::message::domain::MessageId;
    ///
    /// let id = MessageId::parse("550e8400-e29b-41d4-a716-446655440000").expect("valid id");
    /// assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    /// assert!(MessageId::parse("not-a-uuid").is_err());
    /// assert!(MessageId::parse("550E8400-E29B-41D4-A716-446655440000").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, ParseMessageIdError> {
        let malformed = || ParseMessageIdError::Malformed(value.to_owned());
        let uuid = Uuid::parse_str(value).map_err(|_| malformed())?;
        if uuid.hyphenated().to_string() != value {
            return Err(malformed());
        }
        if uuid.is_nil() {
            return Err(ParseMessageIdError::Nil);
        }
        Ok(Self(uuid))
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// Returns `true` for the nil UUID, which is never a valid message id.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Returns the canonical string form used as the document primary key.
    #[must_use]
    pub fn to_key(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

/// Note: This implementation generates a new random UUID on each call,
/// which is non-standard behaviour for `Default`. Use `MessageId::new()`
/// if the intent to generate a random ID should be explicit.
impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for MessageId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl TryFrom<String> for MessageId {
    type Error = ParseMessageIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.to_key()
    }
}

impl FromStr for MessageId {
    type Err = ParseMessageIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned when a textual message identifier cannot be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseMessageIdError {
    /// The value is not a canonical lowercase hyphenated UUID.
    #[error("malformed message id: '{0}'")]
    Malformed(String),

    /// The value is the nil UUID.
    #[error("message id must not be the nil UUID")]
    Nil,
}

/// Creation instant of a message, in milliseconds since the Unix epoch.
///
/// Timestamps are informative rather than unique: two messages created in the
/// same millisecond share a timestamp.
///
/// # Examples
///
/// ```
/// use missive::message::domain::Timestamp;
///
/// let ts = Timestamp::from_millis(1_700_000_000_000);
/// assert_eq!(ts.as_millis(), 1_700_000_000_000);
/// assert!(ts.to_datetime().is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from epoch milliseconds.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Truncates a UTC instant to millisecond precision.
    #[must_use]
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.timestamp_millis())
    }

    /// Reads the current instant from `clock`.
    #[must_use]
    pub fn now(clock: &impl Clock) -> Self {
        Self::from_datetime(clock.utc())
    }

    /// Returns the epoch-millisecond value.
    #[must_use]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Converts back to a UTC instant.
    ///
    /// Returns `None` when the value lies outside the range `chrono` supports.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
