use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the attached blob store; any failure reports degraded mode.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let store = match state.require_blob_store().await {
        Ok(store) => store,
        Err(_) => return HealthResponse::degraded("no storage backend connected"),
    };

    match store.health_check().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            HealthResponse::degraded(err.to_string())
        }
    }
}
