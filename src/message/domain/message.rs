//! The immutable message envelope.
//!
//! A message pairs a header mapping with a payload. Identity and timestamp
//! are fixed at construction; deriving a changed message goes through
//! [`MessageBuilder::from_message`], which always assigns a fresh identity.

use super::headers::is_reserved_header;
use super::{MessageHeaders, MessageId, Payload, Timestamp};
use mockable::Clock;
use serde_json::Value;
use std::collections::BTreeMap;

/// An immutable, uniquely identified envelope of headers and payload.
///
/// # Invariants
///
/// - `headers()["id"]` equals the canonical form of `id()`
/// - `headers()["timestamp"]` equals `timestamp()` in epoch milliseconds
/// - No method mutates a constructed message
///
/// # Examples
///
/// ```
/// use missive::message::domain::Message;
/// use mockable::DefaultClock;
/// use serde_json::json;
///
/// let message = Message::builder("hello")
///     .with_header("priority", json!(5))
///     .build(&DefaultClock)
///     .expect("valid message");
///
/// assert_eq!(message.payload().as_native(), Some(&json!("hello")));
/// assert_eq!(message.headers().get("priority"), Some(&json!(5)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    headers: MessageHeaders,
    payload: Payload,
}

impl Message {
    /// Creates a message with a new identifier, the current timestamp, and no
    /// custom headers.
    #[must_use]
    pub fn new(payload: impl Into<Payload>, clock: &impl Clock) -> Self {
        Self {
            headers: MessageHeaders::from_parts(MessageId::new(), Timestamp::now(clock), []),
            payload: payload.into(),
        }
    }

    /// Reassembles a message from already-validated parts.
    ///
    /// Used when decoding persisted documents, where the id and timestamp come
    /// from storage rather than from a clock.
    #[must_use]
    pub const fn from_parts(headers: MessageHeaders, payload: Payload) -> Self {
        Self { headers, payload }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.headers.id()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.headers.timestamp()
    }

    /// Returns the header mapping.
    #[must_use]
    pub const fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns a builder for a message carrying `payload`.
    #[must_use]
    pub fn builder(payload: impl Into<Payload>) -> MessageBuilder {
        MessageBuilder::new(payload)
    }
}

/// Builder for constructing messages with custom headers.
#[derive(Debug)]
pub struct MessageBuilder {
    id: Option<MessageId>,
    payload: Payload,
    headers: BTreeMap<String, Value>,
    reserved: Vec<String>,
}

impl MessageBuilder {
    /// Creates a builder for `payload`.
    #[must_use]
    pub fn new(payload: impl Into<Payload>) -> Self {
        Self {
            id: None,
            payload: payload.into(),
            headers: BTreeMap::new(),
            reserved: Vec::new(),
        }
    }

    /// Starts from an existing message, copying its payload and custom headers.
    ///
    /// The built message receives a new id and timestamp; the source message
    /// is left untouched.
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        Self {
            id: None,
            payload: message.payload().clone(),
            headers: message
                .headers()
                .custom_entries()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            reserved: Vec::new(),
        }
    }

    /// Sets a specific message ID.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "Option::Some with Copy type should be const but isn't stable"
    )]
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    /// Replaces the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Adds a custom header, replacing any previous value for the key.
    ///
    /// The reserved keys `id` and `timestamp` are recorded and rejected by
    /// [`build`](Self::build).
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: Value) -> Self {
        let header = key.into();
        if is_reserved_header(&header) {
            self.reserved.push(header);
        } else {
            self.headers.insert(header, value);
        }
        self
    }

    /// Adds several custom headers.
    #[must_use]
    pub fn with_headers(
        self,
        headers: impl IntoIterator<Item = (impl Into<String>, Value)>,
    ) -> Self {
        headers
            .into_iter()
            .fold(self, |builder, (key, value)| builder.with_header(key, value))
    }

    /// Removes a custom header.
    #[must_use]
    pub fn without_header(mut self, key: &str) -> Self {
        self.headers.remove(key);
        self
    }

    /// Builds the message, stamping it with the current time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBuilderError::ReservedHeader`] if a custom header used
    /// the key `id` or `timestamp`, and [`MessageBuilderError::NilId`] if the
    /// explicit id is the nil UUID.
    pub fn build(self, clock: &impl Clock) -> Result<Message, MessageBuilderError> {
        if let Some(key) = self.reserved.into_iter().next() {
            return Err(MessageBuilderError::ReservedHeader(key));
        }

        let id = self.id.unwrap_or_default();
        if id.is_nil() {
            return Err(MessageBuilderError::NilId);
        }

        Ok(Message {
            headers: MessageHeaders::from_parts(id, Timestamp::now(clock), self.headers),
            payload: self.payload,
        })
    }
}

/// Errors that can occur when building a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageBuilderError {
    /// A custom header tried to set a store-managed key.
    #[error("header '{0}' is managed by the message and cannot be set directly")]
    ReservedHeader(String),

    /// The explicit identifier is the nil UUID.
    #[error("message id must not be the nil UUID")]
    NilId,
}
