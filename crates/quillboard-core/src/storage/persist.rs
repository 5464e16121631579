//! Autosave-style persistence driver.
//!
//! Sits between the store and a storage backend. Editing never waits on
//! persistence and never fails because of it: a failed save is retried
//! once after best-effort cleanup, then dropped with a warning.

use super::{BlobStorage, Storage, StorageError, StorageResult};
use crate::element::Element;
use crate::store::{DocumentProjection, DocumentStore, StoreConfig, UpdateOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Manages automatic document persistence over a document backend and a
/// blob backend.
pub struct PersistenceManager<S: Storage, B: BlobStorage> {
    storage: Arc<S>,
    blobs: Arc<B>,
    /// Auto-save interval.
    interval: Duration,
    /// Last successful save timestamp.
    last_save: Option<Instant>,
    /// Whether the document has unsaved changes.
    dirty: bool,
    /// Current document ID being edited.
    current_doc_id: String,
}

impl<S: Storage, B: BlobStorage> PersistenceManager<S, B> {
    pub fn new(storage: Arc<S>, blobs: Arc<B>, doc_id: impl Into<String>) -> Self {
        Self {
            storage,
            blobs,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            current_doc_id: doc_id.into(),
        }
    }

    /// Set the auto-save interval.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn document_id(&self) -> &str {
        &self.current_doc_id
    }

    /// Mark the document as having unsaved changes. Called from a store
    /// subscriber on every committed mutation.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if enough time has passed for an auto-save.
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save if dirty and the interval has elapsed. Returns true if a save
    /// was attempted.
    pub async fn maybe_save(&mut self, projection: &DocumentProjection) -> bool {
        if !self.should_save() {
            return false;
        }
        self.save_now(projection).await;
        true
    }

    /// Save immediately. On failure, evicts the oldest other document and
    /// retries once; a second failure is logged and swallowed so editing
    /// is never interrupted.
    pub async fn save_now(&mut self, projection: &DocumentProjection) {
        self.put_image_blobs(projection).await;

        match self.try_save(projection).await {
            Ok(()) => {
                self.last_save = Some(Instant::now());
                self.dirty = false;
            }
            Err(first) => {
                log::warn!("save of {} failed ({first}), evicting and retrying", self.current_doc_id);
                self.evict_one().await;
                match self.try_save(projection).await {
                    Ok(()) => {
                        self.last_save = Some(Instant::now());
                        self.dirty = false;
                    }
                    Err(second) => {
                        log::warn!("save of {} failed after retry: {second}", self.current_doc_id);
                    }
                }
            }
        }
    }

    async fn try_save(&self, projection: &DocumentProjection) -> StorageResult<()> {
        self.storage.save(&self.current_doc_id, projection).await
    }

    /// Push every in-memory image payload to blob storage. Failures are
    /// logged and skipped; the projection still carries the refs.
    async fn put_image_blobs(&self, projection: &DocumentProjection) {
        for element in &projection.elements {
            if let Element::Image(image) = element {
                if let Some(data) = &image.data {
                    if let Err(e) = self.blobs.put(&image.blob_ref, data.as_slice()).await {
                        log::warn!("blob save {} failed: {e}", image.blob_ref);
                    }
                }
            }
        }
    }

    /// Best-effort cleanup: delete the first listed document that is not
    /// the one being saved.
    async fn evict_one(&self) {
        let ids = match self.storage.list().await {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!("eviction list failed: {e}");
                return;
            }
        };
        if let Some(victim) = ids.iter().find(|id| **id != self.current_doc_id) {
            log::warn!("evicting stored document {victim}");
            if let Err(e) = self.storage.delete(victim).await {
                log::warn!("eviction of {victim} failed: {e}");
            }
        }
    }

    /// Load a document into a fresh store, restoring ids verbatim and
    /// patching image payloads from blob storage as they resolve. Missing
    /// blobs are tolerated; the elements keep their refs and stay
    /// data-less.
    pub async fn load_into_store(
        &mut self,
        config: StoreConfig,
    ) -> StorageResult<DocumentStore> {
        let projection = self.storage.load(&self.current_doc_id).await?;
        let mut store = DocumentStore::from_projection(projection, config);

        let image_refs: Vec<_> = store
            .document()
            .ordered()
            .filter_map(|el| match el {
                Element::Image(image) => Some((image.id, image.blob_ref.clone())),
                _ => None,
            })
            .collect();
        for (id, blob_ref) in image_refs {
            match self.blobs.get(&blob_ref).await {
                Ok(bytes) => {
                    let bytes = Arc::new(bytes);
                    store.update_element_with(
                        id,
                        UpdateOptions { push_history: false },
                        |el| {
                            if let Element::Image(image) = el {
                                image.data = Some(bytes.clone());
                            }
                        },
                    );
                }
                Err(StorageError::BlobNotFound(_)) => {
                    log::debug!("blob {blob_ref} missing, image {id} stays unloaded");
                }
                Err(e) => {
                    log::warn!("blob load {blob_ref} failed: {e}");
                }
            }
        }

        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ImageElement, ShapeKind, ShapePrimitive};
    use crate::storage::{block_on, BoxFuture, MemoryStorage};
    use crate::store::AddOptions;
    use kurbo::Point;

    fn store_with_image(data: Option<Arc<Vec<u8>>>) -> DocumentStore {
        let mut store = DocumentStore::new();
        let mut image = ImageElement::new(Point::new(0.0, 0.0), 100.0, 100.0, "blob-1".into());
        image.data = data;
        store.add_element(
            Element::Image(image),
            AddOptions {
                select: false,
                push_history: false,
            },
        );
        store
    }

    #[test]
    fn test_mark_dirty_and_interval_gate() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = PersistenceManager::new(storage.clone(), storage, "doc");

        assert!(!manager.should_save());
        manager.mark_dirty();
        assert!(manager.should_save());

        let projection = DocumentStore::new().projection();
        block_on(manager.save_now(&projection));
        assert!(!manager.is_dirty());
        // Just saved, interval not yet elapsed.
        manager.mark_dirty();
        assert!(!manager.should_save());
        manager.set_interval(Duration::ZERO);
        assert!(manager.should_save());
    }

    #[test]
    fn test_save_and_reload_with_blobs() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = PersistenceManager::new(storage.clone(), storage, "doc");

        let store = store_with_image(Some(Arc::new(vec![1, 2, 3])));
        block_on(manager.save_now(&store.projection()));

        let restored = block_on(manager.load_into_store(StoreConfig::default())).unwrap();
        let el = restored.document().ordered().next().unwrap();
        match el {
            Element::Image(image) => {
                assert!(image.has_data());
                assert_eq!(image.data.as_deref(), Some(&vec![1, 2, 3]));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_missing_blob_is_tolerated() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = PersistenceManager::new(storage.clone(), storage, "doc");

        // Save a projection whose image payload was never in memory, so no
        // blob gets written.
        let store = store_with_image(None);
        block_on(manager.save_now(&store.projection()));

        let restored = block_on(manager.load_into_store(StoreConfig::default())).unwrap();
        let el = restored.document().ordered().next().unwrap();
        match el {
            Element::Image(image) => {
                assert!(!image.has_data());
                assert_eq!(image.blob_ref, "blob-1");
            }
            _ => unreachable!(),
        }
    }

    /// A document backend whose saves always fail, for the retry path.
    struct FailingStorage {
        inner: MemoryStorage,
    }

    impl Storage for FailingStorage {
        fn save(&self, _id: &str, _projection: &DocumentProjection) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk full".into())) })
        }

        fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<DocumentProjection>> {
            self.inner.load(id)
        }

        fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
            self.inner.delete(id)
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            self.inner.list()
        }

        fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            self.inner.exists(id)
        }
    }

    #[test]
    fn test_failed_save_evicts_and_gives_up_quietly() {
        let failing = Arc::new(FailingStorage {
            inner: MemoryStorage::new(),
        });
        // Seed a stored document to be evicted.
        let seed = DocumentStore::new().projection();
        block_on(failing.inner.save("old-doc", &seed)).unwrap();

        let blobs = Arc::new(MemoryStorage::new());
        let mut manager = PersistenceManager::new(failing.clone(), blobs, "doc");
        manager.mark_dirty();

        let projection = store_with_image(None).projection();
        block_on(manager.save_now(&projection));

        // Both attempts failed: still dirty, and the old document was
        // evicted as cleanup.
        assert!(manager.is_dirty());
        assert!(!block_on(failing.inner.exists("old-doc")).unwrap());
    }
}
