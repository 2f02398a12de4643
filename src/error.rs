use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    /// A required field is missing or a value cannot be parsed.
    Validation(String),
    /// A unique key is already taken.
    Conflict(String),
    /// Delete blocked by dependent rows; `entity` is the plural JSON key of the dependents.
    InUse {
        message: String,
        entity: &'static str,
        count: i64,
    },
    /// A foreign id points at a row that does not exist. Holds the entity label.
    InvalidReference(&'static str),
    InvalidOperation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    RateLimited(String),
    Internal(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::InUse {
                message,
                entity,
                count,
            } => write!(f, "In use: {message} ({count} {entity})"),
            AppError::InvalidReference(entity) => write!(f, "Invalid reference: {entity}"),
            AppError::InvalidOperation(msg) => write!(f, "Invalid operation: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::RateLimited(msg) => write!(f, "Rate Limited: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::InUse { .. }
            | AppError::InvalidReference(_)
            | AppError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map storage constraint violations raised by an INSERT/UPDATE onto the
    /// client-facing taxonomy. `unique_message` is used for UNIQUE violations.
    pub fn from_write(err: sqlx::Error, unique_message: &str) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(unique_message.to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::InvalidReference(referenced_label(db_err.constraint()))
            }
            _ => AppError::Database(err),
        }
    }
}

/// Constraint names follow `<table>_<column>_fkey`; the column tells us the target.
fn referenced_label(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.contains("process_id") => "Process",
        Some(c) if c.contains("client_id") => "Client",
        Some(c) if c.contains("user_id") => "User",
        _ => "Record",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::InUse {
                message,
                entity,
                count,
            } => json!({ "message": message, entity: count }),
            AppError::InvalidReference(entity) => {
                json!({ "message": format!("{entity} not found") })
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                json!({ "message": "Internal server error" })
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                json!({ "message": "Internal server error" })
            }
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::InvalidOperation(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::RateLimited(msg) => json!({ "message": msg }),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O failure: {err}"))
    }
}
