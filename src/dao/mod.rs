/// Key-value blob backends holding the catalog document.
pub mod blob_store;
/// Collection-level access on top of a blob store.
pub mod collection;
/// Storage abstraction layer for database operations.
pub mod storage;
