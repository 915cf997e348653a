use futures::future::BoxFuture;

use crate::{
    catalog::{Collection, error::CatalogResult},
    dto::games::SaveAck,
};

/// Source of truth for the collection as seen by a client session.
///
/// Writes always carry the complete desired state; the last writer wins.
pub trait CatalogRepository: Send + Sync {
    /// Fetch the full collection.
    fn load(&self) -> BoxFuture<'static, CatalogResult<Collection>>;
    /// Replace the full collection.
    fn save(&self, games: Collection) -> BoxFuture<'static, CatalogResult<SaveAck>>;
}
