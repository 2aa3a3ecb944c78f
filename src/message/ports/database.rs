//! Document database port.
//!
//! Defines the four collection operations the message store needs. Connection
//! management, credentials, and database selection belong to the adapter.
//!
//! Every operation receives an optional deadline. Adapters must enforce it
//! where the work runs, so that an operation reported as failed has had no
//! effect. Abandoning a call from the outside cannot give that guarantee
//! once the work has been handed to a database or a blocking thread.

use crate::message::{
    codec::Document, domain::CollectionName, error::DocumentDatabaseError,
};
use async_trait::async_trait;
use std::time::Duration;

/// Result type for document database operations.
pub type DatabaseResult<T> = Result<T, DocumentDatabaseError>;

/// Port for a schema-less document database organised in named collections.
///
/// Documents are addressed by the string value of their `_id` field.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - `_id` values are unique within a collection
/// - [`find_and_remove_by_key`](Self::find_and_remove_by_key) fetches and
///   deletes in one atomic step, so concurrent callers removing the same key
///   see the document at most once
/// - Lookups by key do not scan the collection
/// - An operation that exceeds its `deadline` fails with
///   [`DocumentDatabaseError::Unavailable`] and leaves the collection
///   unchanged; in particular a timed-out find-and-remove deletes nothing
#[async_trait]
pub trait DocumentDatabase: Send + Sync {
    /// Inserts a document keyed by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDatabaseError::DuplicateKey`] if the key is taken and
    /// [`DocumentDatabaseError::Unavailable`] if the database cannot be reached
    /// or `deadline` expires.
    async fn insert(
        &self,
        collection: &CollectionName,
        key: &str,
        document: Document,
        deadline: Option<Duration>,
    ) -> DatabaseResult<()>;

    /// Finds the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDatabaseError`] if the query fails.
    async fn find_one_by_key(
        &self,
        collection: &CollectionName,
        key: &str,
        deadline: Option<Duration>,
    ) -> DatabaseResult<Option<Document>>;

    /// Atomically fetches and deletes the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDatabaseError`] if the operation fails.
    async fn find_and_remove_by_key(
        &self,
        collection: &CollectionName,
        key: &str,
        deadline: Option<Duration>,
    ) -> DatabaseResult<Option<Document>>;

    /// Counts the documents in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentDatabaseError`] if the query fails.
    async fn count(
        &self,
        collection: &CollectionName,
        deadline: Option<Duration>,
    ) -> DatabaseResult<u64>;
}
