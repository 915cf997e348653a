use serde::{Deserialize, Serialize};

/// CouchDB document wrapping one blob. The `_id` is the blob key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchBlobDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub content: String,
    /// RFC 3339 timestamp of the last write.
    #[serde(default)]
    pub updated_at: String,
}
