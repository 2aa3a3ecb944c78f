//! Translation between [`Message`] values and stored documents.

use super::document::{Document, HEADERS_FIELD, ID_FIELD, PAYLOAD_FIELD, PAYLOAD_TYPE_FIELD};
use super::PayloadCodec;
use crate::message::domain::{
    Message, MessageHeaders, MessageId, TIMESTAMP_HEADER, Timestamp,
};
use crate::message::error::CodecError;
use serde_json::Value;

/// Maps messages to documents and back.
///
/// Encoding is pure: it reads the message and builds a fresh document.
/// Decoding treats the `_id` field as the authoritative identity, overriding
/// whatever `headers.id` holds, and builds the final header mapping in one
/// step.
///
/// # Examples
///
/// ```
/// use missive::message::codec::MessageDocumentMapper;
/// use missive::message::domain::Message;
/// use mockable::DefaultClock;
///
/// let mapper = MessageDocumentMapper::default();
/// let message = Message::new("hello", &DefaultClock);
///
/// let document = mapper.encode(&message).expect("encodes");
/// assert_eq!(document["_id"], serde_json::json!(message.id().to_string()));
///
/// let decoded = mapper.decode(document).expect("decodes");
/// assert_eq!(decoded, message);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageDocumentMapper {
    codec: PayloadCodec,
}

impl MessageDocumentMapper {
    /// Creates a mapper delegating payloads to `codec`.
    #[must_use]
    pub const fn new(codec: PayloadCodec) -> Self {
        Self { codec }
    }

    /// Returns the payload codec.
    #[must_use]
    pub const fn codec(&self) -> &PayloadCodec {
        &self.codec
    }

    /// Encodes `message` as a document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Unencodable`] if the payload fails to serialise.
    pub fn encode(&self, message: &Message) -> Result<Document, CodecError> {
        let encoded = self.codec.encode(message.payload())?;

        let mut document = Document::new();
        document.insert(ID_FIELD.to_owned(), Value::String(message.id().to_key()));
        document.insert(
            HEADERS_FIELD.to_owned(),
            Value::Object(message.headers().to_document()),
        );
        document.insert(PAYLOAD_FIELD.to_owned(), encoded.document);
        if let Some(tag) = encoded.type_tag {
            document.insert(PAYLOAD_TYPE_FIELD.to_owned(), Value::String(tag.to_owned()));
        }
        Ok(document)
    }

    /// Decodes a stored document into a new message.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SchemaMismatch`] when `_id`, `headers`,
    /// `headers.timestamp`, or `payload` is missing or malformed, or when
    /// `_payloadType` names an unregistered type, and
    /// [`CodecError::PayloadCorrupt`] when the payload does not fit its
    /// declared type.
    pub fn decode(&self, mut document: Document) -> Result<Message, CodecError> {
        let id = read_id(&document)?;

        let stored_headers = match document.remove(HEADERS_FIELD) {
            Some(Value::Object(headers)) => headers,
            Some(_) => {
                return Err(CodecError::schema_mismatch(format!(
                    "'{HEADERS_FIELD}' of document {id} is not a document"
                )));
            }
            None => {
                return Err(CodecError::schema_mismatch(format!(
                    "document {id} has no '{HEADERS_FIELD}' field"
                )));
            }
        };
        let timestamp = read_timestamp(&stored_headers, id)?;

        let type_tag = match document.remove(PAYLOAD_TYPE_FIELD) {
            Some(Value::String(tag)) => Some(tag),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(CodecError::schema_mismatch(format!(
                    "'{PAYLOAD_TYPE_FIELD}' of document {id} is not a string"
                )));
            }
        };
        let stored_payload = document.remove(PAYLOAD_FIELD).ok_or_else(|| {
            CodecError::schema_mismatch(format!("document {id} has no '{PAYLOAD_FIELD}' field"))
        })?;
        let payload = self.codec.decode(stored_payload, type_tag.as_deref())?;

        let headers = MessageHeaders::from_parts(id, timestamp, stored_headers);
        Ok(Message::from_parts(headers, payload))
    }
}

fn read_id(document: &Document) -> Result<MessageId, CodecError> {
    let raw = document
        .get(ID_FIELD)
        .ok_or_else(|| CodecError::schema_mismatch(format!("document has no '{ID_FIELD}' field")))?
        .as_str()
        .ok_or_else(|| CodecError::schema_mismatch(format!("'{ID_FIELD}' is not a string")))?;

    MessageId::parse(raw).map_err(|err| CodecError::schema_mismatch(err.to_string()))
}

fn read_timestamp(
    headers: &serde_json::Map<String, Value>,
    id: MessageId,
) -> Result<Timestamp, CodecError> {
    let value = headers.get(TIMESTAMP_HEADER).ok_or_else(|| {
        CodecError::schema_mismatch(format!("document {id} has no '{TIMESTAMP_HEADER}' header"))
    })?;

    value.as_i64().map(Timestamp::from_millis).ok_or_else(|| {
        CodecError::schema_mismatch(format!(
            "'{TIMESTAMP_HEADER}' header of document {id} is not an integer"
        ))
    })
}
