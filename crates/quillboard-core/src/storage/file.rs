//! File-based storage implementation.

use super::{BlobStorage, BoxFuture, Storage, StorageError, StorageResult};
use crate::store::DocumentProjection;
use std::fs;
use std::path::PathBuf;

/// File-based storage.
///
/// Stores document projections as JSON files and blobs as raw files under
/// a base directory.
pub struct FileStorage {
    /// Base directory for document storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory (and a `blobs/` subdirectory) if absent.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        let blob_path = base_path.join("blobs");
        if !blob_path.exists() {
            fs::create_dir_all(&blob_path)
                .map_err(|e| StorageError::Io(format!("Failed to create storage directory: {e}")))?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/quillboard/documents/`
    /// On Windows: `%APPDATA%\quillboard\documents\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        let path = base.join("quillboard").join("documents");
        Self::new(path)
    }

    /// Get the file path for a document ID.
    fn document_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", sanitize(id)))
    }

    fn blob_path(&self, blob_ref: &str) -> PathBuf {
        self.base_path.join("blobs").join(sanitize(blob_ref))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

/// Sanitize an ID to be safe for filenames.
fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl Storage for FileStorage {
    fn save(&self, id: &str, projection: &DocumentProjection) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);
        let json = match serde_json::to_string(projection) {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DocumentProjection>> {
        let path = self.document_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }

            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;

            serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;

            let mut ids = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                        ids.push(name.to_string());
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

impl BlobStorage for FileStorage {
    fn put(&self, blob_ref: &str, bytes: &[u8]) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.blob_path(blob_ref);
        let bytes = bytes.to_vec();
        Box::pin(async move {
            fs::write(&path, bytes)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
        })
    }

    fn get(&self, blob_ref: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>> {
        let path = self.blob_path(blob_ref);
        let blob_ref = blob_ref.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::BlobNotFound(blob_ref));
            }
            fs::read(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))
        })
    }

    fn delete_blob(&self, blob_ref: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.blob_path(blob_ref);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }
}
