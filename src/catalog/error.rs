use thiserror::Error;

/// Result alias for client-side operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures surfaced to the user. None of them mutate the session's collection.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad input: malformed import file, missing required field, rejected record.
    #[error("invalid data: {0}")]
    Validation(String),
    /// Network failure or unexpected response from the endpoint.
    #[error("request failed: {0}")]
    Transport(String),
    /// The endpoint reported that its backing store failed.
    #[error("storage failure: {0}")]
    Storage(String),
    /// Wrong passphrase.
    #[error("access denied")]
    Unauthorized,
    /// The operation needs edit mode.
    #[error("record is read-only; unlock it first")]
    ReadOnly,
    /// The selected image file could not be read.
    #[error("failed to read photo `{path}`")]
    Photo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(err: validator::ValidationErrors) -> Self {
        CatalogError::Validation(err.to_string())
    }
}
