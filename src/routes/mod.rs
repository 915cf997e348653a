use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{Method, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::SharedState;

pub mod docs;
pub mod games;
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(games::router())
        .merge(docs::router())
        .with_state(state)
}

/// Full application with cross-cutting middleware layers attached.
pub fn app(state: SharedState) -> Router<()> {
    let body_limit = state.config().max_body_bytes;
    router(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(preflight_no_content))
        .layer(TraceLayer::new_for_http())
}

/// The CORS layer answers preflights itself with `200`; report them as `204` like the handler.
async fn preflight_no_content(request: Request<Body>, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}
