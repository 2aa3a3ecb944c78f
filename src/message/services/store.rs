//! The message store facade.
//!
//! [`MessageStore`] exposes add/get/remove/count keyed by [`MessageId`],
//! delegating document shape to [`MessageDocumentMapper`] and I/O to a
//! [`DocumentDatabase`]. It keeps no state between calls beyond the database
//! handle and its fixed configuration.

use crate::message::{
    codec::{MessageDocumentMapper, PayloadCodec},
    config::MessageStoreConfig,
    domain::{CollectionName, Message, MessageId},
    error::{DocumentDatabaseError, MessageStoreError},
    ports::database::DocumentDatabase,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Result type for message store operations.
pub type MessageStoreResult<T> = Result<T, MessageStoreError>;

/// Durable store of immutable messages.
///
/// Every call performs exactly one round trip to the database. Returned
/// messages are fresh snapshots decoded from storage, never views of a cache.
///
/// The configured operation timeout is handed to the database with each
/// call and enforced there. A timed-out call reports
/// [`MessageStoreError::StoreUnavailable`] and has changed nothing; the store
/// never abandons a call that is still running.
///
/// # Example
///
/// ```
/// use missive::message::adapters::memory::InMemoryDocumentDatabase;
/// use missive::message::domain::Message;
/// use missive::message::services::MessageStore;
/// use mockable::DefaultClock;
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().expect("runtime").block_on(async {
/// let store = MessageStore::with_defaults(Arc::new(InMemoryDocumentDatabase::new()));
/// let message = Message::new("hello", &DefaultClock);
///
/// let stored = store.add(message).await.expect("add");
/// let fetched = store.get(stored.id()).await.expect("get");
/// assert_eq!(fetched, Some(stored));
/// # });
/// ```
pub struct MessageStore<D>
where
    D: DocumentDatabase,
{
    database: Arc<D>,
    mapper: MessageDocumentMapper,
    collection: CollectionName,
    operation_timeout: Option<Duration>,
}

impl<D> Clone for MessageStore<D>
where
    D: DocumentDatabase,
{
    fn clone(&self) -> Self {
        Self {
            database: Arc::clone(&self.database),
            mapper: self.mapper.clone(),
            collection: self.collection.clone(),
            operation_timeout: self.operation_timeout,
        }
    }
}

impl<D> MessageStore<D>
where
    D: DocumentDatabase,
{
    /// Creates a store over `database` using `config`.
    #[must_use]
    pub fn new(database: Arc<D>, config: MessageStoreConfig) -> Self {
        let codec = PayloadCodec::new(Arc::clone(config.registry()));
        Self {
            database,
            mapper: MessageDocumentMapper::new(codec),
            collection: config.collection().clone(),
            operation_timeout: config.operation_timeout(),
        }
    }

    /// Creates a store with the default configuration.
    #[must_use]
    pub fn with_defaults(database: Arc<D>) -> Self {
        Self::new(database, MessageStoreConfig::default())
    }

    /// Returns the collection this store reads and writes.
    #[must_use]
    pub const fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// Returns the document mapper.
    #[must_use]
    pub const fn mapper(&self) -> &MessageDocumentMapper {
        &self.mapper
    }

    /// Persists a copy of `message` and hands it back unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::InvalidArgument`] for a nil id (before
    /// any I/O), [`MessageStoreError::DuplicateMessage`] if the id is already
    /// stored, and [`MessageStoreError::StoreUnavailable`] if the payload
    /// cannot be encoded or the database cannot be reached.
    #[instrument(skip(self, message), fields(collection = %self.collection, message_id = %message.id()))]
    pub async fn add(&self, message: Message) -> MessageStoreResult<Message> {
        let id = ensure_not_nil(message.id())?;
        let document = self.mapper.encode(&message)?;

        self.database
            .insert(&self.collection, &id.to_key(), document, self.operation_timeout)
            .await
            .map_err(|err| match err {
                DocumentDatabaseError::DuplicateKey(_) => MessageStoreError::DuplicateMessage(id),
                other => other.into(),
            })?;

        debug!("message stored");
        Ok(message)
    }

    /// Fetches the message stored under `id`.
    ///
    /// Returns `Ok(None)` when no such message exists.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::InvalidArgument`] for a nil id,
    /// [`MessageStoreError::SchemaMismatch`] or
    /// [`MessageStoreError::PayloadCorrupt`] if the stored document cannot be
    /// decoded, and [`MessageStoreError::StoreUnavailable`] on database
    /// failure.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn get(&self, id: MessageId) -> MessageStoreResult<Option<Message>> {
        let key = ensure_not_nil(id)?.to_key();
        let stored = self
            .database
            .find_one_by_key(&self.collection, &key, self.operation_timeout)
            .await?;

        let message = self.decode_stored(stored)?;
        debug!(found = message.is_some(), "message lookup finished");
        Ok(message)
    }

    /// Fetches a message by the textual form of its id.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::InvalidArgument`] if `key` is not a valid
    /// message id, otherwise behaves like [`get`](Self::get).
    pub async fn get_by_key(&self, key: &str) -> MessageStoreResult<Option<Message>> {
        let id = MessageId::parse(key)?;
        self.get(id).await
    }

    /// Atomically fetches and deletes the message stored under `id`.
    ///
    /// Returns `Ok(None)` when no such message exists. Of several concurrent
    /// removals of the same id, exactly one observes the message.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get). A document that fails to decode has
    /// already been deleted when the error is returned.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn remove(&self, id: MessageId) -> MessageStoreResult<Option<Message>> {
        let key = ensure_not_nil(id)?.to_key();
        let removed = self
            .database
            .find_and_remove_by_key(&self.collection, &key, self.operation_timeout)
            .await?;

        let message = self.decode_stored(removed)?;
        debug!(removed = message.is_some(), "message removal finished");
        Ok(message)
    }

    /// Removes a message by the textual form of its id.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::InvalidArgument`] if `key` is not a valid
    /// message id, otherwise behaves like [`remove`](Self::remove).
    pub async fn remove_by_key(&self, key: &str) -> MessageStoreResult<Option<Message>> {
        let id = MessageId::parse(key)?;
        self.remove(id).await
    }

    /// Counts the messages in the configured collection.
    ///
    /// # Errors
    ///
    /// Returns [`MessageStoreError::StoreUnavailable`] on database failure.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn count(&self) -> MessageStoreResult<u64> {
        let total = self
            .database
            .count(&self.collection, self.operation_timeout)
            .await?;
        debug!(total, "messages counted");
        Ok(total)
    }

    fn decode_stored(
        &self,
        stored: Option<crate::message::codec::Document>,
    ) -> MessageStoreResult<Option<Message>> {
        stored
            .map(|document| {
                self.mapper.decode(document).inspect_err(|err| {
                    warn!(error = %err, "stored document failed to decode");
                })
            })
            .transpose()
            .map_err(MessageStoreError::from)
    }
}

fn ensure_not_nil(id: MessageId) -> MessageStoreResult<MessageId> {
    if id.is_nil() {
        return Err(MessageStoreError::invalid_argument(
            "message id must not be the nil UUID",
        ));
    }
    Ok(id)
}
