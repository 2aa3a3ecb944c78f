//! Immutable message header mapping.

use super::{MessageId, Timestamp};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Reserved header key holding the message identifier.
pub const ID_HEADER: &str = "id";

/// Reserved header key holding the creation timestamp.
pub const TIMESTAMP_HEADER: &str = "timestamp";

/// Returns `true` when `key` names a header the store manages itself.
#[must_use]
pub fn is_reserved_header(key: &str) -> bool {
    key == ID_HEADER || key == TIMESTAMP_HEADER
}

/// Immutable mapping from header names to values.
///
/// The mapping always contains [`ID_HEADER`] (the canonical string form of the
/// message id) and [`TIMESTAMP_HEADER`] (epoch milliseconds). Both are derived
/// from the typed fields at construction time, so `headers["id"] == id` holds
/// for every value of this type.
///
/// # Examples
///
/// ```
/// use missive::message::domain::{MessageHeaders, MessageId, Timestamp};
/// use serde_json::json;
///
/// let id = MessageId::new();
/// let headers = MessageHeaders::from_parts(
///     id,
///     Timestamp::from_millis(42),
///     [("priority".to_owned(), json!(5))],
/// );
///
/// assert_eq!(headers.get("id"), Some(&json!(id.to_string())));
/// assert_eq!(headers.get("timestamp"), Some(&json!(42)));
/// assert_eq!(headers.get("priority"), Some(&json!(5)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeaders {
    id: MessageId,
    timestamp: Timestamp,
    entries: BTreeMap<String, Value>,
}

impl MessageHeaders {
    /// Builds the final mapping in one step.
    ///
    /// Entries in `extra` named `id` or `timestamp` are replaced by the
    /// authoritative `id` and `timestamp` values.
    #[must_use]
    pub fn from_parts(
        id: MessageId,
        timestamp: Timestamp,
        extra: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let entries = extra
            .into_iter()
            .filter(|(key, _)| !is_reserved_header(key))
            .chain([
                (ID_HEADER.to_owned(), Value::String(id.to_key())),
                (
                    TIMESTAMP_HEADER.to_owned(),
                    Value::from(timestamp.as_millis()),
                ),
            ])
            .collect();

        Self {
            id,
            timestamp,
            entries,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Looks up a header by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` when the header is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries, including `id` and `timestamp`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; the reserved entries are never absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over every entry in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Iterates over the free-form entries, skipping `id` and `timestamp`.
    pub fn custom_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries
            .iter()
            .filter(|(key, _)| !is_reserved_header(key))
    }

    /// Copies the mapping into a document sub-object.
    #[must_use]
    pub fn to_document(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a MessageHeaders {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
