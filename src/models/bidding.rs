use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bidding_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BiddingStatus {
    #[default]
    Analyzing,
    Participating,
    Won,
    Lost,
    NotParticipated,
    Cancelled,
}

/// A public procurement notice ("licitação") tracked through its lifecycle.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BiddingRecord {
    pub id: i64,
    pub edital_number: Option<String>,
    pub organ: String,
    pub object: String,
    pub publication_date: Option<NaiveDate>,
    pub deadline_date: Option<NaiveDate>,
    pub status: BiddingStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BiddingInput {
    pub edital_number: Option<String>,
    pub organ: String,
    pub object: String,
    pub publication_date: Option<NaiveDate>,
    pub deadline_date: Option<NaiveDate>,
    pub status: BiddingStatus,
    pub description: Option<String>,
}
