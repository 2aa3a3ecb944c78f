//! Message store configuration.
//!
//! The configuration is fixed when the store is constructed; nothing in it
//! changes afterwards.

use super::codec::PayloadTypeRegistry;
use super::domain::CollectionName;
use super::error::ConfigError;
use std::sync::Arc;
use std::time::Duration;

/// Settings for a [`MessageStore`](super::services::MessageStore).
///
/// # Examples
///
/// ```
/// use missive::message::config::MessageStoreConfig;
/// use std::time::Duration;
///
/// let config = MessageStoreConfig::default();
/// assert_eq!(config.collection().as_str(), "messages");
/// assert!(config.operation_timeout().is_none());
///
/// let tuned = MessageStoreConfig::default()
///     .with_collection("audit")
///     .and_then(|config| config.with_operation_timeout(Duration::from_secs(2)))
///     .expect("valid configuration");
/// assert_eq!(tuned.collection().as_str(), "audit");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageStoreConfig {
    collection: CollectionName,
    registry: Arc<PayloadTypeRegistry>,
    operation_timeout: Option<Duration>,
}

impl MessageStoreConfig {
    /// Creates the default configuration: collection `messages`, an empty
    /// payload registry, and no operation timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collection from a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Collection`] if the name is invalid.
    pub fn with_collection(self, name: impl Into<String>) -> Result<Self, ConfigError> {
        let collection = CollectionName::new(name)?;
        Ok(self.with_collection_name(collection))
    }

    /// Sets an already-validated collection name.
    #[must_use]
    pub fn with_collection_name(mut self, collection: CollectionName) -> Self {
        self.collection = collection;
        self
    }

    /// Sets the payload type registry used to decode tagged payloads.
    #[must_use]
    pub fn with_registry(mut self, registry: PayloadTypeRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Shares an existing payload type registry.
    #[must_use]
    pub fn with_shared_registry(mut self, registry: Arc<PayloadTypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Bounds every store operation by `timeout`.
    ///
    /// The limit is passed to the database with each call, which aborts the
    /// work without effect once it is exceeded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] if `timeout` is zero.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.operation_timeout = Some(timeout);
        Ok(self)
    }

    /// Returns the configured collection.
    #[must_use]
    pub const fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// Returns the payload type registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<PayloadTypeRegistry> {
        &self.registry
    }

    /// Returns the per-operation timeout, if any.
    #[must_use]
    pub const fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout
    }
}
