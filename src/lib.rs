//! Missive: a durable message store over document databases.
//!
//! This crate persists immutable, uniquely identified message envelopes
//! (headers plus a polymorphic payload) as schema-less documents and
//! retrieves them faithfully, restoring typed payloads through an explicit
//! payload type registry.
//!
//! # Architecture
//!
//! Missive follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`message`]: Message model, document codec, and the message store

pub mod message;
