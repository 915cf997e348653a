use serde::Serialize;
use utoipa::ToSchema;

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Storage reachable, reads and writes are served.
    Ok,
    /// No storage backend reachable; `/games` answers 503.
    Degraded,
}

/// Body of `/healthcheck`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: HealthStatus,
    /// Why the service is degraded, absent when healthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthResponse {
    /// Storage reachable.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
            reason: None,
        }
    }

    /// No storage backend is reachable.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            reason: Some(reason.into()),
        }
    }
}
