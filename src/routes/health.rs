use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::health::HealthResponse, services::health_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "health",
    responses((status = 200, description = "Service status", body = HealthResponse))
)]
/// Report whether the storage backend is reachable.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(health_service::health_status(&state).await)
}

/// Health check route.
pub fn router() -> Router<SharedState> {
    Router::new().route("/healthcheck", get(healthcheck))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::{
        config::AppConfig, dao::blob_store::InMemoryBlobStore, routes, state::AppState,
    };

    async fn status_of(app: axum::Router<()>) -> serde_json::Value {
        let request = Request::builder()
            .uri("/healthcheck")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn reports_ok_with_store() {
        let state =
            AppState::with_store(AppConfig::default(), Arc::new(InMemoryBlobStore::new())).await;
        let body = status_of(routes::app(state)).await;
        assert_eq!(body["status"], "ok");
        assert!(body.get("reason").is_none());
    }

    #[tokio::test]
    async fn reports_degraded_without_store() {
        let state = AppState::new(AppConfig::default());
        let body = status_of(routes::app(state)).await;
        assert_eq!(body["status"], "degraded");
        assert!(body["reason"].is_string());
    }
}
