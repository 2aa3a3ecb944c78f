//! Durable storage for immutable message envelopes.
//!
//! Messages (headers plus an arbitrary payload) are persisted as schema-less
//! documents and decoded back into equal messages, including the concrete
//! type of typed payloads.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Message`], [`domain::MessageHeaders`], [`domain::Payload`], etc.)
//! - **Codec**: Message and payload document encoding ([`codec::MessageDocumentMapper`], [`codec::PayloadCodec`], [`codec::PayloadTypeRegistry`])
//! - **Ports**: Abstract trait interfaces ([`ports::database::DocumentDatabase`])
//! - **Adapters**: Concrete implementations ([`adapters::memory::InMemoryDocumentDatabase`], [`adapters::postgres::PostgresDocumentDatabase`])
//! - **Services**: The public facade ([`services::MessageStore`])
//!
//! # Example
//!
//! ```
//! use missive::message::adapters::memory::InMemoryDocumentDatabase;
//! use missive::message::config::MessageStoreConfig;
//! use missive::message::domain::Message;
//! use missive::message::services::MessageStore;
//! use mockable::DefaultClock;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().expect("runtime").block_on(async {
//! let database = Arc::new(InMemoryDocumentDatabase::new());
//! let store = MessageStore::new(database, MessageStoreConfig::default());
//!
//! let message = Message::new("Hello, store!", &DefaultClock);
//! let id = message.id();
//! store.add(message).await.expect("add");
//! assert_eq!(store.count().await.expect("count"), 1);
//!
//! let removed = store.remove(id).await.expect("remove");
//! assert!(removed.is_some());
//! assert!(store.get(id).await.expect("get").is_none());
//! # });
//! ```

pub mod adapters;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
