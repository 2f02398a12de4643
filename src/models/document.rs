use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of an uploaded file. The bytes live on disk at `filepath`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    #[serde(skip_serializing)]
    pub filepath: String,
    pub original_filename: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub process_id: Option<i64>,
    pub client_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row written after a successful upload.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub filepath: String,
    pub original_filename: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub process_id: Option<i64>,
    pub client_id: Option<i64>,
    pub user_id: i64,
}
