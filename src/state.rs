use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::blob_store::BlobStore, error::ServiceError};

pub type SharedState = Arc<AppState>;

/// Central application state: configuration and the active storage backend.
pub struct AppState {
    config: AppConfig,
    blob_store: RwLock<Option<Arc<dyn BlobStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            blob_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Shortcut building a state with an already connected store.
    pub async fn with_store(config: AppConfig, store: Arc<dyn BlobStore>) -> SharedState {
        let state = Self::new(config);
        state.set_blob_store(store).await;
        state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current blob store, if one is installed.
    pub async fn blob_store(&self) -> Option<Arc<dyn BlobStore>> {
        let guard = self.blob_store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store, or [`ServiceError::Degraded`] when storage is unavailable.
    pub async fn require_blob_store(&self) -> Result<Arc<dyn BlobStore>, ServiceError> {
        if self.is_degraded().await {
            return Err(ServiceError::Degraded);
        }
        self.blob_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new blob store implementation and leave degraded mode.
    pub async fn set_blob_store(&self, store: Arc<dyn BlobStore>) {
        {
            let mut guard = self.blob_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::blob_store::InMemoryBlobStore;

    #[tokio::test]
    async fn starts_degraded_without_store() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded().await);
        assert!(matches!(
            state.require_blob_store().await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installing_store_leaves_degraded_mode() {
        let state = AppState::new(AppConfig::default());
        let mut watcher = state.degraded_watcher();
        state
            .set_blob_store(Arc::new(InMemoryBlobStore::new()))
            .await;
        assert!(!state.is_degraded().await);
        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());
        assert!(state.require_blob_store().await.is_ok());
    }

    #[tokio::test]
    async fn health_failure_flips_back_to_degraded() {
        let state =
            AppState::with_store(AppConfig::default(), Arc::new(InMemoryBlobStore::new())).await;
        state.update_degraded(true).await;
        assert!(state.require_blob_store().await.is_err());
    }
}
