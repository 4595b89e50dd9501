//! In-memory store doubles for service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{BlobRef, BlobStore, DocumentStore, StoredDocument};
use crate::errors::AppError;

/// Blob store that keeps bytes in memory and counts writes.
#[derive(Default)]
pub struct CountingBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    fail: bool,
}

impl CountingBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn stored(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl BlobStore for CountingBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<BlobRef, AppError> {
        if self.fail {
            return Err(AppError::Internal("bucket unavailable".to_string()));
        }
        let mut blobs = self.blobs.lock().unwrap();
        if blobs.contains_key(path) {
            return Err(AppError::Internal(format!("Blob {} already exists", path)));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        blobs.insert(path.to_string(), bytes);
        Ok(BlobRef {
            path: path.to_string(),
        })
    }

    async fn resolve_url(&self, blob: &BlobRef) -> Result<String, AppError> {
        Ok(format!("memory://{}", blob.path))
    }
}

/// Document store whose reads see at most one seeded document and whose writes all fail.
pub struct FailingDocumentStore {
    seeded: Option<(String, StoredDocument)>,
}

impl FailingDocumentStore {
    pub fn with_document(collection: &str, id: &str, body: Value) -> Self {
        Self {
            seeded: Some((
                collection.to_string(),
                StoredDocument {
                    id: id.to_string(),
                    body,
                },
            )),
        }
    }

    fn seeded_in(&self, collection: &str) -> Option<&StoredDocument> {
        self.seeded
            .as_ref()
            .filter(|(c, _)| c == collection)
            .map(|(_, doc)| doc)
    }

    fn write_error() -> AppError {
        AppError::Internal("Database error: disk full".to_string())
    }
}

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn insert(&self, _collection: &str, _doc: &Value) -> Result<String, AppError> {
        Err(Self::write_error())
    }

    async fn set_with_id(&self, _collection: &str, _id: &str, _doc: &Value) -> Result<(), AppError> {
        Err(Self::write_error())
    }

    async fn get_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredDocument>, AppError> {
        Ok(self.seeded_in(collection).filter(|doc| doc.id == id).cloned())
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError> {
        Ok(self.seeded_in(collection).cloned().into_iter().collect())
    }

    async fn update(&self, _collection: &str, _id: &str, _doc: &Value) -> Result<bool, AppError> {
        Err(Self::write_error())
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<(), AppError> {
        Err(Self::write_error())
    }

    async fn query_by_field(
        &self,
        _collection: &str,
        _field: &str,
        _value: &str,
    ) -> Result<Option<StoredDocument>, AppError> {
        Ok(None)
    }
}
