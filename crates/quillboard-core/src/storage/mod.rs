//! Storage abstraction for persistence.

mod file;
mod memory;
mod persist;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use persist::{DEFAULT_AUTOSAVE_INTERVAL_SECS, PersistenceManager};

use crate::store::DocumentProjection;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Blob not found: {0}")]
    BlobNotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for document storage backends.
///
/// Implementations persist the serializable projection of a board, keyed
/// by document id. Image payloads never travel through here; they go
/// through [`BlobStorage`] and the projection carries only their refs.
pub trait Storage: Send + Sync {
    /// Save a document projection.
    fn save(&self, id: &str, projection: &DocumentProjection) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a document projection.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DocumentProjection>>;

    /// Delete a document.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all document IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a document exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for opaque blob storage (image bytes).
pub trait BlobStorage: Send + Sync {
    /// Store bytes under a blob reference key.
    fn put(&self, blob_ref: &str, bytes: &[u8]) -> BoxFuture<'_, StorageResult<()>>;

    /// Fetch the bytes for a blob reference.
    fn get(&self, blob_ref: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>>;

    /// Delete a blob. Deleting a missing blob is not an error.
    fn delete_blob(&self, blob_ref: &str) -> BoxFuture<'_, StorageResult<()>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
