//! Persistence adapters for the message module.
//!
//! This module provides concrete implementations of the [`DocumentDatabase`]
//! port. Adapters handle all infrastructure concerns while the domain and
//! codec remain pure.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryDocumentDatabase`]: Thread-safe in-memory storage for
//!   testing and single-process embedding
//! - [`postgres::PostgresDocumentDatabase`]: `PostgreSQL` persistence storing
//!   documents as verbatim JSON using Diesel ORM
//!
//! [`DocumentDatabase`]: crate::message::ports::DocumentDatabase

pub mod memory;
pub mod postgres;
