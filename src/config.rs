//! Application-level configuration loading: edit passphrase, storage key and request limits.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "LUDOTHEQUE_CONFIG_PATH";
/// Passphrase gating create/edit/delete when none is configured.
pub const DEFAULT_PASSPHRASE: &str = "1664";
/// Blob key holding the collection.
pub const DEFAULT_COLLECTION_KEY: &str = "games.json";
/// Photos travel inline as data URLs, so bodies are far larger than axum's 2 MiB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Shared secret for create, edit and delete.
    pub passphrase: String,
    /// Blob key the collection document lives under.
    pub collection_key: String,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to the built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        collection_key = %config.collection_key,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON configuration document. Absent keys keep their defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            passphrase: DEFAULT_PASSPHRASE.to_owned(),
            collection_key: DEFAULT_COLLECTION_KEY.to_owned(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    passphrase: Option<String>,
    collection_key: Option<String>,
    max_body_bytes: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            passphrase: value.passphrase.unwrap_or(defaults.passphrase),
            collection_key: value
                .collection_key
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(defaults.collection_key),
            max_body_bytes: value
                .max_body_bytes
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.max_body_bytes),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
