use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metadata for a document attached to a loan. The bytes themselves live on
/// disk (or wherever `storage_path` points); this system never stores blobs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FileRecord {
    pub id: String,
    pub loan_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_path: String,
    /// Set by the thumbnail step when conversion succeeds; stays `None`
    /// when the converter is missing or fails.
    pub thumbnail_path: Option<String>,
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}
