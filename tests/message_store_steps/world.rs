//! Shared world state for message store BDD scenarios.

use std::sync::Arc;

use missive::message::{
    adapters::memory::InMemoryDocumentDatabase,
    codec::PayloadTypeRegistry,
    config::MessageStoreConfig,
    domain::{Message, MessageId, TypedPayload},
    services::{MessageStore, MessageStoreResult},
};
use rstest::fixture;
use serde::{Deserialize, Serialize};

/// Store type used by the BDD world.
pub type TestStore = MessageStore<InMemoryDocumentDatabase>;

/// Typed payload known to the scenario store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    /// Ticket reference.
    pub reference: String,
}

impl TypedPayload for SupportTicket {
    const TYPE_TAG: &'static str = "support.SupportTicket";
}

/// Scenario world for message store behaviour tests.
pub struct MessageStoreWorld {
    /// Database shared with the store, for writing documents directly.
    pub database: Arc<InMemoryDocumentDatabase>,
    /// The store under test.
    pub store: TestStore,
    /// Message built by a given step and not yet added.
    pub pending: Option<Message>,
    /// Message known to be stored.
    pub stored: Option<Message>,
    /// Identifier of a document written around the store.
    pub raw_id: Option<MessageId>,
    /// Result of the last add.
    pub last_add: Option<MessageStoreResult<Message>>,
    /// Result of the last fetch.
    pub last_fetch: Option<MessageStoreResult<Option<Message>>>,
    /// Result of the last removal.
    pub last_remove: Option<MessageStoreResult<Option<Message>>>,
}

impl MessageStoreWorld {
    /// Creates a world over an empty in-memory database.
    #[must_use]
    pub fn new() -> Self {
        let registry = PayloadTypeRegistry::new()
            .register::<SupportTicket>()
            .expect("ticket type registers");
        let database = Arc::new(InMemoryDocumentDatabase::new());
        let store = MessageStore::new(
            Arc::clone(&database),
            MessageStoreConfig::new().with_registry(registry),
        );
        Self {
            database,
            store,
            pending: None,
            stored: None,
            raw_id: None,
            last_add: None,
            last_fetch: None,
            last_remove: None,
        }
    }

    /// Returns the message the scenario is about.
    ///
    /// # Errors
    ///
    /// Returns an error when no step has produced a message yet.
    pub fn subject(&self) -> Result<&Message, eyre::Report> {
        self.stored
            .as_ref()
            .or(self.pending.as_ref())
            .ok_or_else(|| eyre::eyre!("no message in scenario world"))
    }
}

impl Default for MessageStoreWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MessageStoreWorld {
    MessageStoreWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
