//! SQLite-backed blob store. Blobs are served back under `/images/<path>`.
//!
//! Paths are write-once: a second `put` to the same path fails.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::{BlobRef, BlobStore};
use crate::errors::AppError;

/// Route prefix under which blobs are publicly served.
pub const BLOB_ROUTE_PREFIX: &str = "/images";

/// A blob read back from storage.
#[derive(Debug, Clone)]
pub struct Blob {
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct SqliteBlobStore {
    pool: SqlitePool,
    public_base_url: String,
}

impl SqliteBlobStore {
    pub fn new(pool: SqlitePool, public_base_url: impl Into<String>) -> Self {
        Self {
            pool,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch a blob for serving.
    pub async fn get(&self, path: &str) -> Result<Option<Blob>, AppError> {
        let row = sqlx::query("SELECT content_type, data FROM blobs WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Blob {
            content_type: row.get("content_type"),
            data: row.get("data"),
        }))
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<BlobRef, AppError> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO blobs (path, content_type, data, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(path)
        .bind(content_type)
        .bind(&bytes)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AppError::Internal(format!("Blob {} already exists", path)));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(BlobRef {
            path: path.to_string(),
        })
    }

    async fn resolve_url(&self, blob: &BlobRef) -> Result<String, AppError> {
        Ok(format!(
            "{}{}/{}",
            self.public_base_url,
            BLOB_ROUTE_PREFIX,
            blob.path.trim_start_matches('/')
        ))
    }
}
