//! Polymorphic message payloads.
//!
//! A payload is either document-native (any JSON value, stored as-is with no
//! type tag) or an application type implementing [`TypedPayload`], which
//! carries a canonical type tag so the document can be decoded back into the
//! same concrete type.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An application payload type that survives a round trip through storage.
///
/// `TYPE_TAG` is the canonical name written to the `_payloadType` document
/// field. It must be stable across releases and unique within a registry.
///
/// # Examples
///
/// ```
/// use missive::message::domain::TypedPayload;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct OrderPlaced {
///     order_id: u64,
/// }
///
/// impl TypedPayload for OrderPlaced {
///     const TYPE_TAG: &'static str = "shop.orders.OrderPlaced";
/// }
/// ```
pub trait TypedPayload:
    Serialize + DeserializeOwned + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Canonical, fully-qualified type name.
    const TYPE_TAG: &'static str;
}

/// Object-safe view of a [`TypedPayload`] value.
///
/// Implemented for every `TypedPayload`; callers never implement it directly.
pub trait ErasedPayload: fmt::Debug + Send + Sync + 'static {
    /// Returns the canonical type tag of the concrete type.
    fn type_tag(&self) -> &'static str;

    /// Serialises the value into its document form.
    ///
    /// # Errors
    ///
    /// Returns the serde error raised by the concrete type's `Serialize`
    /// implementation.
    fn to_value(&self) -> Result<Value, serde_json::Error>;

    /// Exposes the value for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Compares with another erased value of possibly different type.
    fn eq_erased(&self, other: &dyn ErasedPayload) -> bool;
}

impl<T: TypedPayload> ErasedPayload for T {
    fn type_tag(&self) -> &'static str {
        T::TYPE_TAG
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedPayload) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|value| value == self)
    }
}

/// The payload carried by a [`Message`](super::Message).
///
/// # Examples
///
/// ```
/// use missive::message::domain::Payload;
///
/// let payload = Payload::from("hello");
/// assert_eq!(payload.as_native(), Some(&serde_json::json!("hello")));
/// assert!(payload.type_tag().is_none());
/// ```
#[derive(Debug, Clone)]
pub enum Payload {
    /// A document-native value stored without a type tag.
    Native(Value),
    /// An application type restored through the payload type registry.
    Typed(Arc<dyn ErasedPayload>),
}

impl Payload {
    /// Wraps a document-native value.
    #[must_use]
    pub fn native(value: impl Into<Value>) -> Self {
        Self::Native(value.into())
    }

    /// Wraps an application payload.
    #[must_use]
    pub fn typed<T: TypedPayload>(value: T) -> Self {
        Self::Typed(Arc::new(value))
    }

    /// Returns the type tag recorded for this payload, if any.
    #[must_use]
    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            Self::Native(_) => None,
            Self::Typed(value) => Some((**value).type_tag()),
        }
    }

    /// Returns the document-native value, if this is a native payload.
    #[must_use]
    pub const fn as_native(&self) -> Option<&Value> {
        match self {
            Self::Native(value) => Some(value),
            Self::Typed(_) => None,
        }
    }

    /// Downcasts a typed payload to its concrete type.
    #[must_use]
    pub fn downcast_ref<T: TypedPayload>(&self) -> Option<&T> {
        match self {
            Self::Native(_) => None,
            Self::Typed(value) => (**value).as_any().downcast_ref::<T>(),
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Native(lhs), Self::Native(rhs)) => lhs == rhs,
            (Self::Typed(lhs), Self::Typed(rhs)) => (**lhs).eq_erased(&**rhs),
            _ => false,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Native(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Native(Value::String(value.to_owned()))
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Native(Value::String(value))
    }
}
