use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{blob_store::BlobStore, storage::StorageResult};

/// Process-local blob store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let blobs = self.blobs.clone();
        let key = key.to_owned();
        Box::pin(async move { Ok(blobs.read().await.get(&key).cloned()) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let blobs = self.blobs.clone();
        let key = key.to_owned();
        Box::pin(async move {
            blobs.write().await.insert(key, value);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
