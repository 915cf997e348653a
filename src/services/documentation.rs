use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the catalog service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::games::list_games,
        crate::routes::games::save_games,
        crate::routes::games::preflight,
    ),
    components(
        schemas(
            crate::catalog::Game,
            crate::dto::games::SaveAck,
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Whole-collection read and replace"),
    )
)]
pub struct ApiDoc;
