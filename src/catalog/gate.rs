use tracing::warn;

use crate::{
    catalog::error::{CatalogError, CatalogResult},
    config::AppConfig,
};

/// Shared-secret check run before any mutating action. Not a security boundary.
#[derive(Debug, Clone)]
pub struct Gate {
    passphrase: String,
}

impl Gate {
    /// Gate on an explicit passphrase.
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// Gate on the configured passphrase.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.passphrase.clone())
    }

    /// Exact comparison, no trimming.
    pub fn authorize(&self, secret: &str) -> bool {
        secret == self.passphrase
    }

    /// Like [`Gate::authorize`], as a `Result` for `?` chains.
    pub fn check(&self, secret: &str) -> CatalogResult<()> {
        if self.authorize(secret) {
            Ok(())
        } else {
            warn!("passphrase rejected");
            Err(CatalogError::Unauthorized)
        }
    }
}
