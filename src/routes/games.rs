use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{Method, StatusCode},
    routing::get,
};
use serde_json::Value;

use crate::{
    dto::games::SaveAck, error::AppError, services::collection_service, state::SharedState,
};

/// The single catalog resource.
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/games",
        get(list_games)
            .post(save_games)
            .options(preflight)
            .fallback(method_not_allowed),
    )
}

/// Return the whole collection, `[]` when nothing was saved yet.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    responses(
        (status = 200, description = "Current collection", body = [crate::catalog::Game]),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
        (status = 503, description = "No storage backend connected", body = crate::error::ErrorBody)
    )
)]
pub async fn list_games(State(state): State<SharedState>) -> Result<Json<Vec<Value>>, AppError> {
    let games = collection_service::fetch_collection(&state).await?;
    Ok(Json(games))
}

/// Replace the whole collection with the posted array.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = [crate::catalog::Game],
    responses(
        (status = 200, description = "Collection replaced", body = SaveAck),
        (status = 400, description = "Malformed body or invalid record", body = crate::error::ErrorBody),
        (status = 413, description = "Body over the configured limit", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody),
        (status = 503, description = "No storage backend connected", body = crate::error::ErrorBody)
    )
)]
pub async fn save_games(
    State(state): State<SharedState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SaveAck>, AppError> {
    let body = body?;
    let ack = collection_service::replace_collection(&state, &body).await?;
    Ok(Json(ack))
}

/// Answer cross-origin preflight checks; CORS headers come from the router layers.
#[utoipa::path(
    options,
    path = "/games",
    tag = "games",
    responses((status = 204, description = "Preflight accepted"))
)]
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}
