//! In-memory implementation of the `DocumentDatabase` port.
//!
//! Provides a simple, thread-safe document database for tests and
//! single-process embedding. Contents are lost when the last handle drops.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::message::{
    codec::Document,
    domain::CollectionName,
    error::DocumentDatabaseError,
    ports::database::{DatabaseResult, DocumentDatabase},
};

type Collections = HashMap<CollectionName, HashMap<String, Document>>;

/// In-memory implementation of [`DocumentDatabase`].
///
/// Thread-safe via internal [`RwLock`]. Clones share the same storage.
/// Find-and-remove runs under a single write lock, so it is atomic with
/// respect to every other operation. Operations never wait on I/O, so the
/// deadline is not consulted.
///
/// # Example
///
/// ```
/// use missive::message::adapters::memory::InMemoryDocumentDatabase;
///
/// let database = InMemoryDocumentDatabase::new();
/// assert!(database.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentDatabase {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents across all collections.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty database. For error-propagating access, use
    /// the port methods instead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collections
            .read()
            .map(|guard| guard.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }

    /// Returns `true` if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(err: impl std::fmt::Display) -> DocumentDatabaseError {
    DocumentDatabaseError::unavailable_msg(format!("lock poisoned: {err}"))
}

#[async_trait]
impl DocumentDatabase for InMemoryDocumentDatabase {
    async fn insert(
        &self,
        collection: &CollectionName,
        key: &str,
        document: Document,
        _deadline: Option<Duration>,
    ) -> DatabaseResult<()> {
        let mut guard = self.collections.write().map_err(poisoned)?;

        match guard.entry(collection.clone()).or_default().entry(key.to_owned()) {
            Entry::Occupied(_) => Err(DocumentDatabaseError::DuplicateKey(key.to_owned())),
            Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(())
            }
        }
    }

    async fn find_one_by_key(
        &self,
        collection: &CollectionName,
        key: &str,
        _deadline: Option<Duration>,
    ) -> DatabaseResult<Option<Document>> {
        let guard = self.collections.read().map_err(poisoned)?;

        Ok(guard
            .get(collection)
            .and_then(|documents| documents.get(key))
            .cloned())
    }

    async fn find_and_remove_by_key(
        &self,
        collection: &CollectionName,
        key: &str,
        _deadline: Option<Duration>,
    ) -> DatabaseResult<Option<Document>> {
        let mut guard = self.collections.write().map_err(poisoned)?;

        Ok(guard
            .get_mut(collection)
            .and_then(|documents| documents.remove(key)))
    }

    async fn count(
        &self,
        collection: &CollectionName,
        _deadline: Option<Duration>,
    ) -> DatabaseResult<u64> {
        let guard = self.collections.read().map_err(poisoned)?;

        let count = guard.get(collection).map_or(0, HashMap::len);
        u64::try_from(count).map_err(DocumentDatabaseError::unavailable)
    }
}
