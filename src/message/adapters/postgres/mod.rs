//! `PostgreSQL` adapter for document persistence.

mod database;
mod models;
mod schema;

pub use database::{DocumentPgPool, PostgresDocumentDatabase};
