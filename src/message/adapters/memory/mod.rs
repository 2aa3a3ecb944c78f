//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! unit testing without database dependencies.

mod database;

pub use database::InMemoryDocumentDatabase;
