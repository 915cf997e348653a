use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::{
    catalog::Game,
    dao::collection::CollectionRepository,
    dto::games::SaveAck,
    error::ServiceError,
    state::SharedState,
};

/// Return the stored collection, or an empty one when nothing was saved yet.
pub async fn fetch_collection(state: &SharedState) -> Result<Vec<Value>, ServiceError> {
    let repository = repository(state).await?;
    Ok(repository.load().await?)
}

/// Parse, validate and persist a full replacement of the collection.
///
/// Nothing is written unless every element passes validation. The accepted
/// elements are stored exactly as received.
pub async fn replace_collection(state: &SharedState, body: &[u8]) -> Result<SaveAck, ServiceError> {
    let items = parse_collection(body)?;
    validate_collection(&items)?;

    let repository = repository(state).await?;
    repository.replace(&items).await?;

    info!(count = items.len(), "collection replaced");
    Ok(SaveAck::stored(items.len()))
}

/// Decode a request body that must be a JSON array.
pub fn parse_collection(body: &[u8]) -> Result<Vec<Value>, ServiceError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ServiceError::InvalidInput(format!("malformed JSON body: {err}")))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ServiceError::InvalidInput(
            "body must be a JSON array of games".into(),
        )),
    }
}

/// Every element must be a well-formed record with non-blank `id` and `nom`,
/// and ids must be unique across the collection.
pub fn validate_collection(items: &[Value]) -> Result<(), ServiceError> {
    let mut seen_ids = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let game = Game::deserialize(item).map_err(|err| {
            ServiceError::InvalidInput(format!("game at index {index} is malformed: {err}"))
        })?;

        game.validate().map_err(|err| {
            ServiceError::InvalidInput(format!("game at index {index} is invalid: {err}"))
        })?;

        if !seen_ids.insert(game.id.clone()) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate game id `{}` at index {index}",
                game.id
            )));
        }
    }
    Ok(())
}

async fn repository(state: &SharedState) -> Result<CollectionRepository, ServiceError> {
    let store = state.require_blob_store().await?;
    Ok(CollectionRepository::new(
        store,
        state.config().collection_key.clone(),
    ))
}
