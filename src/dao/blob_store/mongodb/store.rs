use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::bson::doc;
use tokio::sync::RwLock;
use tracing::info;

use super::{
    config::MongoConfig,
    connection::{self, MongoHandle},
    error::{MongoDaoError, MongoResult},
    models::MongoBlobDocument,
};
use crate::dao::{blob_store::BlobStore, storage::StorageResult};

/// Blob store backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoBlobStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    handle: RwLock<MongoHandle>,
    config: MongoConfig,
}

impl MongoBlobStore {
    /// Connect and verify the server answers before returning.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let handle = connection::open(&config).await?;
        info!(database = %config.database_name, "MongoDB blob store ready");

        Ok(Self {
            inner: Arc::new(MongoInner {
                handle: RwLock::new(handle),
                config,
            }),
        })
    }

    async fn handle(&self) -> MongoHandle {
        self.inner.handle.read().await.clone()
    }

    async fn load(&self, key: String) -> MongoResult<Option<String>> {
        let document = self
            .handle()
            .await
            .blobs
            .find_one(doc! { "_id": &key })
            .await
            .map_err(|source| MongoDaoError::LoadBlob {
                key: key.clone(),
                source,
            })?;
        Ok(document.map(|doc| doc.content))
    }

    async fn save(&self, key: String, content: String) -> MongoResult<()> {
        let document = MongoBlobDocument::new(key.clone(), content);
        self.handle()
            .await
            .blobs
            .replace_one(doc! { "_id": &key }, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveBlob { key, source })?;
        Ok(())
    }

    async fn ping(&self) -> MongoResult<()> {
        self.handle()
            .await
            .ping()
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let handle = connection::open(&self.inner.config).await?;
        *self.inner.handle.write().await = handle;
        Ok(())
    }
}

impl BlobStore for MongoBlobStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.load(key).await.map_err(Into::into) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.save(key, value).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.reconnect().await.map_err(Into::into) })
    }
}
