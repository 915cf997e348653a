use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Where the Swagger UI is mounted.
pub const SWAGGER_PATH: &str = "/docs";
/// Where the raw OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/api-doc/openapi.json";

/// Swagger UI plus the OpenAPI document it renders.
pub fn router() -> Router<SharedState> {
    SwaggerUi::new(SWAGGER_PATH)
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn openapi_document_describes_games_resource() {
        let app = router().with_state(AppState::new(AppConfig::default()));
        let response = app
            .oneshot(Request::builder().uri(OPENAPI_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        let games = &doc["paths"]["/games"];
        for verb in ["get", "post", "options"] {
            assert!(games.get(verb).is_some(), "missing {verb}");
        }
        assert!(doc["components"]["schemas"].get("Game").is_some());
    }
}
