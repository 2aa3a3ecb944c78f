//! Persisted document shape.
//!
//! A stored message has the layout
//!
//! ```text
//! {
//!   "_id": "<canonical message id>",
//!   "headers": { "id": "<message id>", "timestamp": <epoch millis>, ... },
//!   "payload": <document>,
//!   "_payloadType": "<type tag, optional>"
//! }
//! ```

use serde_json::{Map, Value};

/// Generic schema-less document exchanged with the database.
pub type Document = Map<String, Value>;

/// Primary-key field holding the canonical message id.
pub const ID_FIELD: &str = "_id";

/// Nested header mapping.
pub const HEADERS_FIELD: &str = "headers";

/// Encoded payload.
pub const PAYLOAD_FIELD: &str = "payload";

/// Optional payload type tag.
pub const PAYLOAD_TYPE_FIELD: &str = "_payloadType";
