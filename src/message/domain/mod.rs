//! Domain types for the message store.
//!
//! This module contains pure domain types with no infrastructure dependencies.
//! Messages and their headers are immutable after construction.

mod collection;
mod headers;
mod ids;
mod message;
mod payload;

pub use collection::{CollectionName, CollectionNameError, DEFAULT_COLLECTION_NAME};
pub use headers::{ID_HEADER, MessageHeaders, TIMESTAMP_HEADER, is_reserved_header};
pub use ids::{MessageId, ParseMessageIdError, Timestamp};
pub use message::{Message, MessageBuilder, MessageBuilderError};
pub use payload::{ErasedPayload, Payload, TypedPayload};
