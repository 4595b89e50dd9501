//! Storage module: the document store and blob store the recipe service talks to.
//!
//! Both are traits so the service only ever sees injected handles. The
//! production implementations live in SQLite.

mod blobs;
mod documents;
#[cfg(test)]
pub mod testing;

pub use blobs::*;
pub use documents::*;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;

/// A document read back from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: Value,
}

/// Schemaless JSON document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert under a freshly generated id and return that id.
    async fn insert(&self, collection: &str, doc: &Value) -> Result<String, AppError>;

    /// Create or overwrite the document stored under `id`.
    async fn set_with_id(&self, collection: &str, id: &str, doc: &Value) -> Result<(), AppError>;

    async fn get_by_id(&self, collection: &str, id: &str)
        -> Result<Option<StoredDocument>, AppError>;

    /// Every document in the collection, in insertion order.
    async fn list_all(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError>;

    /// Replace an existing document. Returns `false` when `id` is absent.
    async fn update(&self, collection: &str, id: &str, doc: &Value) -> Result<bool, AppError>;

    /// Remove a document. Unknown ids are not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError>;

    /// First document whose top-level `field` equals `value`.
    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, AppError>;
}

/// Handle to a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub path: String,
}

/// Binary object storage with publicly fetchable URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<BlobRef, AppError>;

    async fn resolve_url(&self, blob: &BlobRef) -> Result<String, AppError>;
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (collection, id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blobs (
            path TEXT PRIMARY KEY,
            content_type TEXT NOT NULL,
            data BLOB NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq);")
        .execute(pool)
        .await?;

    Ok(())
}
