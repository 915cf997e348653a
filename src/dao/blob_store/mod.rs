#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

pub use memory::InMemoryBlobStore;

/// Abstraction over a key-value document store holding raw JSON blobs.
///
/// Implementations only guarantee get/set-by-key semantics; whether a read
/// observes the latest write depends on the backend's own consistency mode.
pub trait BlobStore: Send + Sync {
    /// Fetch the blob stored under `key`, or `None` when nothing was written yet.
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Replace the blob stored under `key` in a single write.
    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
