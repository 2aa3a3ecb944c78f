//! Closed registry of decodable payload types.
//!
//! Every type tag that may appear in a stored `_payloadType` field must be
//! registered here before the store reads it. Tags that are not registered
//! fail to decode; nothing is resolved by name at runtime.

use crate::message::domain::{Payload, TypedPayload};
use crate::message::error::RegistryError;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;

/// Decoder bound to a registered type tag.
pub type PayloadDecoder = fn(Value) -> Result<Payload, serde_json::Error>;

fn decode_typed<T: TypedPayload>(value: Value) -> Result<Payload, serde_json::Error> {
    serde_json::from_value::<T>(value).map(Payload::typed)
}

#[derive(Debug, Clone, Copy)]
struct RegisteredType {
    type_id: TypeId,
    decode: PayloadDecoder,
}

/// Mapping from payload type tags to decoders.
///
/// Built once at startup by the modules that own each payload type, then
/// shared immutably.
///
/// # Examples
///
/// ```
/// use missive::message::codec::PayloadTypeRegistry;
/// use missive::message::domain::TypedPayload;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Ping {
///     seq: u32,
/// }
///
/// impl TypedPayload for Ping {
///     const TYPE_TAG: &'static str = "example.Ping";
/// }
///
/// let registry = PayloadTypeRegistry::new()
///     .register::<Ping>()
///     .expect("unique tag");
/// assert!(registry.contains("example.Ping"));
/// assert!(!registry.contains("example.Pong"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayloadTypeRegistry {
    types: HashMap<&'static str, RegisteredType>,
}

impl PayloadTypeRegistry {
    /// Creates an empty registry; only document-native payloads decode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under its type tag.
    ///
    /// Registering the same type twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyTag`] when `T::TYPE_TAG` is blank and
    /// [`RegistryError::DuplicateTag`] when the tag is already bound to a
    /// different type.
    pub fn register<T: TypedPayload>(mut self) -> Result<Self, RegistryError> {
        let tag = T::TYPE_TAG;
        if tag.trim().is_empty() {
            return Err(RegistryError::EmptyTag);
        }

        let type_id = TypeId::of::<T>();
        match self.types.get(tag) {
            Some(existing) if existing.type_id == type_id => Ok(self),
            Some(_) => Err(RegistryError::DuplicateTag(tag.to_owned())),
            None => {
                self.types.insert(
                    tag,
                    RegisteredType {
                        type_id,
                        decode: decode_typed::<T>,
                    },
                );
                Ok(self)
            }
        }
    }

    /// Returns the decoder for `tag`, if registered.
    #[must_use]
    pub fn resolve(&self, tag: &str) -> Option<PayloadDecoder> {
        self.types.get(tag).map(|registered| registered.decode)
    }

    /// Returns `true` when `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    /// Lists the registered tags in sorted order.
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.types.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` when no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
