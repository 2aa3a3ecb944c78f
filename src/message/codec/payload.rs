//! Type-erasing payload codec.

use super::PayloadTypeRegistry;
use crate::message::domain::Payload;
use crate::message::error::CodecError;
use serde_json::Value;
use std::sync::Arc;

/// A payload in document form plus the tag needed to restore its type.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPayload {
    /// The payload's document representation.
    pub document: Value,
    /// Type tag for typed payloads; `None` for document-native payloads.
    pub type_tag: Option<&'static str>,
}

/// Encodes payloads to documents and restores them through a
/// [`PayloadTypeRegistry`].
///
/// # Examples
///
/// ```
/// use missive::message::codec::{PayloadCodec, PayloadTypeRegistry};
/// use missive::message::domain::Payload;
/// use std::sync::Arc;
///
/// let codec = PayloadCodec::new(Arc::new(PayloadTypeRegistry::new()));
/// let encoded = codec.encode(&Payload::from("hello")).expect("encodes");
/// assert!(encoded.type_tag.is_none());
///
/// let decoded = codec.decode(encoded.document, None).expect("decodes");
/// assert_eq!(decoded, Payload::from("hello"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayloadCodec {
    registry: Arc<PayloadTypeRegistry>,
}

impl PayloadCodec {
    /// Creates a codec resolving type tags through `registry`.
    #[must_use]
    pub const fn new(registry: Arc<PayloadTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry used for decoding.
    #[must_use]
    pub fn registry(&self) -> &PayloadTypeRegistry {
        &self.registry
    }

    /// Converts a payload into its document form.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Unencodable`] if a typed payload fails to
    /// serialise.
    pub fn encode(&self, payload: &Payload) -> Result<EncodedPayload, CodecError> {
        match payload {
            Payload::Native(value) => Ok(EncodedPayload {
                document: value.clone(),
                type_tag: None,
            }),
            Payload::Typed(value) => {
                let type_tag = (**value).type_tag();
                let document = (**value)
                    .to_value()
                    .map_err(|err| CodecError::Unencodable {
                        type_tag: type_tag.to_owned(),
                        source: Arc::new(err),
                    })?;
                Ok(EncodedPayload {
                    document,
                    type_tag: Some(type_tag),
                })
            }
        }
    }

    /// Restores a payload from its document form.
    ///
    /// Without a tag the document is returned as a native payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::SchemaMismatch`] when `type_tag` is not
    /// registered and [`CodecError::PayloadCorrupt`] when the document does
    /// not deserialise into the registered type.
    pub fn decode(&self, document: Value, type_tag: Option<&str>) -> Result<Payload, CodecError> {
        let Some(tag) = type_tag else {
            return Ok(Payload::Native(document));
        };

        let decode = self.registry.resolve(tag).ok_or_else(|| {
            CodecError::schema_mismatch(format!("unresolvable payload type '{tag}'"))
        })?;

        decode(document).map_err(|err| CodecError::payload_corrupt(tag, err.to_string()))
    }
}
