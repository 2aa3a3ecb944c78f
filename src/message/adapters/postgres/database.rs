//! `PostgreSQL` implementation of the `DocumentDatabase` port using Diesel ORM.
//!
//! Documents are stored whole in a `JSON` column keyed by
//! `(collection, document_key)`. The `JSON` type keeps the document text
//! exactly as written, so numbers come back with the same integer or float
//! form they were stored with. Find-and-remove is a single
//! `DELETE ... RETURNING` statement.
//!
//! Each operation runs in its own transaction. When a deadline is given it
//! bounds the pool checkout and is installed as `statement_timeout` for the
//! transaction, so the server cancels an overrunning statement and rolls it
//! back instead of completing it unobserved.

use super::{models::NewDocumentRow, schema::message_documents};
use crate::message::{
    codec::Document,
    domain::CollectionName,
    error::DocumentDatabaseError,
    ports::database::{DatabaseResult, DocumentDatabase},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;
use std::time::Duration;

/// `PostgreSQL` connection pool type for the document adapter.
pub type DocumentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed [`DocumentDatabase`].
///
/// Uses Diesel ORM with connection pooling via r2d2. Blocking Diesel calls
/// run on Tokio's blocking thread pool.
///
/// # Example
///
/// ```ignore
/// use diesel::r2d2::{ConnectionManager, Pool};
/// use diesel::PgConnection;
/// use missive::message::adapters::postgres::PostgresDocumentDatabase;
///
/// let manager = ConnectionManager::<PgConnection>::new("postgres://...");
/// let pool = Pool::builder().build(manager).expect("pool");
/// let database = PostgresDocumentDatabase::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresDocumentDatabase {
    pool: DocumentPgPool,
}

impl PostgresDocumentDatabase {
    /// Creates a new adapter from a `PostgreSQL` pool.
    #[must_use]
    pub const fn new(pool: DocumentPgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &DocumentPgPool {
        &self.pool
    }

    /// Runs `operation` in a transaction on the blocking pool.
    ///
    /// The outer result reports checkout and scheduling failures; the inner
    /// one carries the query outcome so callers can classify it.
    async fn run_in_transaction<F, T>(
        &self,
        deadline: Option<Duration>,
        operation: F,
    ) -> DatabaseResult<QueryResult<T>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let checkout = match deadline {
                Some(limit) => pool.get_timeout(limit),
                None => pool.get(),
            };
            let mut pooled = checkout.map_err(DocumentDatabaseError::unavailable)?;
            let connection: &mut PgConnection = &mut pooled;

            Ok(connection.transaction::<_, DieselError, _>(|conn| {
                if let Some(limit) = deadline {
                    set_statement_timeout(conn, limit)?;
                }
                operation(conn)
            }))
        })
        .await
        .map_err(DocumentDatabaseError::unavailable)?
    }
}

fn set_statement_timeout(conn: &mut PgConnection, limit: Duration) -> QueryResult<usize> {
    // PostgreSQL SET does not support parameter binding ($1); the value is a
    // formatted integer. Zero would disable the timeout, so the floor is 1ms.
    let millis = i32::try_from(limit.as_millis()).unwrap_or(i32::MAX).max(1);
    diesel::sql_query(format!("SET LOCAL statement_timeout = {millis}")).execute(conn)
}

#[async_trait]
impl DocumentDatabase for PostgresDocumentDatabase {
    async fn insert(
        &self,
        collection: &CollectionName,
        key: &str,
        document: Document,
        deadline: Option<Duration>,
    ) -> DatabaseResult<()> {
        let row = NewDocumentRow {
            collection: collection.as_str().to_owned(),
            document_key: key.to_owned(),
            document: Value::Object(document),
        };
        let document_key = row.document_key.clone();

        self.run_in_transaction(deadline, move |connection| {
            diesel::insert_into(message_documents::table)
                .values(&row)
                .execute(connection)
        })
        .await?
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DocumentDatabaseError::DuplicateKey(document_key)
            }
            other => DocumentDatabaseError::unavailable(other),
        })?;
        Ok(())
    }

    async fn find_one_by_key(
        &self,
        collection: &CollectionName,
        key: &str,
        deadline: Option<Duration>,
    ) -> DatabaseResult<Option<Document>> {
        let name = collection.as_str().to_owned();
        let document_key = key.to_owned();

        let stored = self
            .run_in_transaction(deadline, move |connection| {
                message_documents::table
                    .filter(message_documents::collection.eq(&name))
                    .filter(message_documents::document_key.eq(&document_key))
                    .select(message_documents::document)
                    .first::<Value>(connection)
                    .optional()
            })
            .await?
            .map_err(DocumentDatabaseError::unavailable)?;
        stored.map(into_document).transpose()
    }

    async fn find_and_remove_by_key(
        &self,
        collection: &CollectionName,
        key: &str,
        deadline: Option<Duration>,
    ) -> DatabaseResult<Option<Document>> {
        let name = collection.as_str().to_owned();
        let document_key = key.to_owned();

        let removed = self
            .run_in_transaction(deadline, move |connection| {
                diesel::delete(
                    message_documents::table
                        .filter(message_documents::collection.eq(&name))
                        .filter(message_documents::document_key.eq(&document_key)),
                )
                .returning(message_documents::document)
                .get_result::<Value>(connection)
                .optional()
            })
            .await?
            .map_err(DocumentDatabaseError::unavailable)?;
        removed.map(into_document).transpose()
    }

    async fn count(
        &self,
        collection: &CollectionName,
        deadline: Option<Duration>,
    ) -> DatabaseResult<u64> {
        let name = collection.as_str().to_owned();

        let total: i64 = self
            .run_in_transaction(deadline, move |connection| {
                message_documents::table
                    .filter(message_documents::collection.eq(&name))
                    .count()
                    .get_result(connection)
            })
            .await?
            .map_err(DocumentDatabaseError::unavailable)?;
        u64::try_from(total).map_err(DocumentDatabaseError::unavailable)
    }
}

fn into_document(value: Value) -> DatabaseResult<Document> {
    match value {
        Value::Object(document) => Ok(document),
        other => Err(DocumentDatabaseError::Malformed(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}
