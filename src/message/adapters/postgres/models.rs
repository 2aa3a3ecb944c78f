//! Diesel row models for document persistence.

use super::schema::message_documents;
use diesel::prelude::*;
use serde_json::Value;

/// Insert model for document records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = message_documents)]
pub struct NewDocumentRow {
    /// Owning collection.
    pub collection: String,
    /// Primary key within the collection.
    pub document_key: String,
    /// Document body.
    pub document: Value,
}
