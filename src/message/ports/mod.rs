//! Port trait definitions for the message store.
//!
//! Ports define the abstract interfaces that the store requires from
//! infrastructure. Adapters implement these ports to connect the store to
//! concrete databases.

pub mod database;

pub use database::{DatabaseResult, DocumentDatabase};
