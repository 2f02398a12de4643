use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{BiddingInput, BiddingRecord, BiddingStatus};
use crate::routes::params;
use crate::state::SharedState;
use crate::validation::fields;

#[derive(Deserialize)]
pub struct BiddingPayload {
    pub edital_number: Option<String>,
    pub organ: Option<String>,
    pub object: Option<String>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub publication_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub deadline_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub status: Option<BiddingStatus>,
    pub description: Option<String>,
}

impl BiddingPayload {
    fn into_input(self) -> Result<BiddingInput, AppError> {
        Ok(BiddingInput {
            edital_number: fields::optional(self.edital_number),
            organ: fields::required(self.organ, "organ")?,
            object: fields::required(self.object, "object")?,
            publication_date: self.publication_date,
            deadline_date: self.deadline_date,
            status: self.status.unwrap_or_default(),
            description: fields::optional(self.description),
        })
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub limit: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound("Bidding record not found".to_string())
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<BiddingRecord>>, AppError> {
    let query = params::query(query)?;
    let statuses = params::status_list(query.status.as_deref())?;
    let limit = params::limit(query.limit.as_deref())?;

    let records = db::biddings::list(&state.pool, statuses, limit).await?;
    Ok(Json(records))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BiddingRecord>, AppError> {
    let id = params::path(id)?;
    let record = db::biddings::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(record))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<BiddingPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<BiddingRecord>), AppError> {
    let input = params::json_body(payload)?.into_input()?;
    let record = db::biddings::create(&state.pool, &input).await?;

    tracing::info!(user_id = auth.user_id, bidding_id = record.id, "Bidding record created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BiddingPayload>, JsonRejection>,
) -> Result<Json<BiddingRecord>, AppError> {
    let id = params::path(id)?;
    let input = params::json_body(payload)?.into_input()?;

    let record = db::biddings::update(&state.pool, id, &input)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            e => AppError::Database(e),
        })?;

    tracing::info!(user_id = auth.user_id, bidding_id = id, "Bidding record updated");
    Ok(Json(record))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = params::path(id)?;
    if !db::biddings::delete(&state.pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, bidding_id = id, "Bidding record deleted");
    Ok(Json(serde_json::json!({ "message": "Bidding record deleted" })))
}
