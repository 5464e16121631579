//! In-memory storage implementation.

use super::{BlobStorage, BoxFuture, Storage, StorageError, StorageResult};
use crate::store::DocumentProjection;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use. Also serves as the
/// blob backend when nothing durable is configured.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, DocumentProjection>>,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, projection: &DocumentProjection) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let projection = projection.clone();
        Box::pin(async move {
            let mut docs = self
                .documents
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            docs.insert(id, projection);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DocumentProjection>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self
                .documents
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            docs.get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut docs = self
                .documents
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            docs.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let docs = self
                .documents
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            Ok(docs.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self
                .documents
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            Ok(docs.contains_key(&id))
        })
    }
}

impl BlobStorage for MemoryStorage {
    fn put(&self, blob_ref: &str, bytes: &[u8]) -> BoxFuture<'_, StorageResult<()>> {
        let blob_ref = blob_ref.to_string();
        let bytes = bytes.to_vec();
        Box::pin(async move {
            let mut blobs = self
                .blobs
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            blobs.insert(blob_ref, bytes);
            Ok(())
        })
    }

    fn get(&self, blob_ref: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>> {
        let blob_ref = blob_ref.to_string();
        Box::pin(async move {
            let blobs = self
                .blobs
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            blobs
                .get(&blob_ref)
                .cloned()
                .ok_or(StorageError::BlobNotFound(blob_ref))
        })
    }

    fn delete_blob(&self, blob_ref: &str) -> BoxFuture<'_, StorageResult<()>> {
        let blob_ref = blob_ref.to_string();
        Box::pin(async move {
            let mut blobs = self
                .blobs
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {e}")))?;
            blobs.remove(&blob_ref);
            Ok(())
        })
    }
}
