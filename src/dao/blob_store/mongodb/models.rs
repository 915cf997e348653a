use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// One blob per document, keyed by `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBlobDocument {
    #[serde(rename = "_id")]
    pub key: String,
    pub content: String,
    pub updated_at: DateTime,
}

impl MongoBlobDocument {
    pub fn new(key: String, content: String) -> Self {
        Self {
            key,
            content,
            updated_at: DateTime::now(),
        }
    }
}
