//! Application services for the message store.
//!
//! Services orchestrate the codec and the database port to implement the
//! public store operations.

mod store;

pub use store::{MessageStore, MessageStoreResult};
