use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::dao::{
    blob_store::BlobStore,
    storage::{StorageError, StorageResult},
};

/// Reads and writes the whole catalog as one JSON array stored under a single key.
#[derive(Clone)]
pub struct CollectionRepository {
    store: Arc<dyn BlobStore>,
    key: String,
}

impl CollectionRepository {
    pub fn new(store: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Current collection, or an empty one when nothing was ever written.
    pub async fn load(&self) -> StorageResult<Vec<Value>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            debug!(key = %self.key, "no collection stored yet");
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupted {
            key: self.key.clone(),
            source,
        })
    }

    /// Replace the stored collection with `items` in a single write.
    pub async fn replace(&self, items: &[Value]) -> StorageResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| StorageError::Encode {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, raw).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dao::blob_store::InMemoryBlobStore;

    fn repository() -> (CollectionRepository, InMemoryBlobStore) {
        let store = InMemoryBlobStore::new();
        (
            CollectionRepository::new(Arc::new(store.clone()), "games.json"),
            store,
        )
    }

    #[tokio::test]
    async fn empty_store_loads_as_empty_collection() {
        let (repository, _) = repository();
        assert!(repository.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_then_load_keeps_order() {
        let (repository, _) = repository();
        let items = vec![
            json!({"id": "a2", "nom": "Carcassonne"}),
            json!({"id": "a1", "nom": "Catan"}),
        ];
        repository.replace(&items).await.unwrap();
        assert_eq!(repository.load().await.unwrap(), items);
    }

    #[tokio::test]
    async fn non_array_blob_is_reported_as_corrupted() {
        let (repository, store) = repository();
        store
            .set("games.json", r#"{"id":"a1"}"#.into())
            .await
            .unwrap();
        let err = repository.load().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupted { .. }));
    }
}
