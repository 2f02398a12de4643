use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "process_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    #[default]
    Active,
    Archived,
    Suspended,
    Finished,
}

/// A legal case, optionally owned by a client.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Process {
    pub id: i64,
    pub process_number: String,
    pub court: Option<String>,
    pub district: Option<String>,
    pub action_type: Option<String>,
    pub status: ProcessStatus,
    pub client_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProcessInput {
    pub process_number: String,
    pub court: Option<String>,
    pub district: Option<String>,
    pub action_type: Option<String>,
    pub status: ProcessStatus,
    pub client_id: Option<i64>,
    pub description: Option<String>,
}
