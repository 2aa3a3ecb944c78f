//! Diesel schema for document persistence.

diesel::table! {
    /// Schema-less documents grouped by collection.
    message_documents (collection, document_key) {
        /// Collection the document belongs to.
        #[max_length = 100]
        collection -> Varchar,
        /// String value of the document's `_id` field.
        document_key -> Text,
        /// The full document, stored verbatim.
        document -> Json,
    }
}
