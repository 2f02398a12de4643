use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Natural person (CPF) or legal entity (CNPJ).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "client_type")]
pub enum ClientType {
    #[serde(rename = "PF")]
    #[sqlx(rename = "PF")]
    Individual,
    #[serde(rename = "PJ")]
    #[sqlx(rename = "PJ")]
    Organization,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    pub cpf_cnpj: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated field set written by create and full update.
#[derive(Debug, Clone)]
pub struct ClientInput {
    pub name: String,
    pub client_type: ClientType,
    pub cpf_cnpj: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
