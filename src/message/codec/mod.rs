//! Document encoding for messages and their payloads.
//!
//! - [`MessageDocumentMapper`]: message ↔ document translation
//! - [`PayloadCodec`]: payload ↔ document translation with type tags
//! - [`PayloadTypeRegistry`]: the closed set of decodable payload types

pub mod document;
mod mapper;
mod payload;
mod registry;

pub use document::Document;
pub use mapper::MessageDocumentMapper;
pub use payload::{EncodedPayload, PayloadCodec};
pub use registry::{PayloadDecoder, PayloadTypeRegistry};
