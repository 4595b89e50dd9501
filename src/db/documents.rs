//! SQLite-backed document store.
//!
//! Each document is a JSON body keyed by `(collection, id)`. The autoincrement
//! `seq` column keeps insertion order stable across overwrites.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use super::{DocumentStore, StoredDocument};
use crate::errors::AppError;

/// Document store for all collections.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert(&self, collection: &str, doc: &Value) -> Result<String, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let body = serde_json::to_string(doc)?;

        sqlx::query(
            "INSERT INTO documents (collection, id, body, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(&id)
        .bind(&body)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn set_with_id(&self, collection: &str, id: &str, doc: &Value) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let body = serde_json::to_string(doc)?;

        sqlx::query(
            r#"INSERT INTO documents (collection, id, body, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (collection, id)
               DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at"#,
        )
        .bind(collection)
        .bind(id)
        .bind(&body)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query("SELECT id, body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError> {
        let rows = sqlx::query("SELECT id, body FROM documents WHERE collection = ? ORDER BY seq")
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(document_from_row).collect()
    }

    async fn update(&self, collection: &str, id: &str, doc: &Value) -> Result<bool, AppError> {
        let now = Utc::now().to_rfc3339();
        let body = serde_json::to_string(doc)?;

        let result = sqlx::query(
            "UPDATE documents SET body = ?, updated_at = ? WHERE collection = ? AND id = ?",
        )
        .bind(&body)
        .bind(&now)
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Delete of missing document {}/{}", collection, id);
        }
        Ok(())
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, body FROM documents
               WHERE collection = ? AND json_extract(body, ?) = ?
               ORDER BY seq LIMIT 1"#,
        )
        .bind(collection)
        .bind(json_path(field)?)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }
}

/// JSON path selecting a top-level key.
fn json_path(field: &str) -> Result<String, AppError> {
    if field.is_empty() || field.contains('"') {
        return Err(AppError::Internal(format!("Invalid document field: {:?}", field)));
    }
    Ok(format!("$.\"{}\"", field))
}

fn document_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredDocument, AppError> {
    let body: String = row.get("body");
    Ok(StoredDocument {
        id: row.get("id"),
        body: serde_json::from_str(&body)?,
    })
}
