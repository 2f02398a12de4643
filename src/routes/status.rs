use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub async fn status() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now() }))
}

/// JSON 404 for unknown `/api` paths, so they never fall through to the static site.
pub async fn unknown_api() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Route not found" })),
    )
}
