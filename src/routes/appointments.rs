use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::appointments::AppointmentFilter;
use crate::error::AppError;
use crate::models::{Appointment, AppointmentInput};
use crate::routes::params;
use crate::state::SharedState;
use crate::validation::fields;
use crate::validation::references::{self, Reference, Referenced};

#[derive(Deserialize)]
pub struct AppointmentPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub process_id: Option<i64>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub client_id: Option<i64>,
}

impl AppointmentPayload {
    fn into_input(self) -> Result<AppointmentInput, AppError> {
        let input = AppointmentInput {
            title: fields::required(self.title, "title")?,
            description: fields::optional(self.description),
            start_time: fields::mandatory(self.start_time, "start_time")?,
            end_time: self.end_time,
            process_id: self.process_id,
            client_id: self.client_id,
        };
        if input.end_time.is_some_and(|end| end < input.start_time) {
            return Err(AppError::Validation(
                "end_time must not be before start_time".to_string(),
            ));
        }
        references::require_link(input.process_id, input.client_id, "Appointment")?;
        Ok(input)
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "params::optional_id")]
    pub process_id: Option<i64>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub client_id: Option<i64>,
    pub limit: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound("Appointment not found".to_string())
}

async fn check_references(state: &SharedState, input: &AppointmentInput) -> Result<(), AppError> {
    references::ensure(
        &state.pool,
        &[
            Reference::new("process_id", Referenced::Process, input.process_id),
            Reference::new("client_id", Referenced::Client, input.client_id),
        ],
    )
    .await
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let query = params::query(query)?;
    let filter = AppointmentFilter {
        process_id: query.process_id,
        client_id: query.client_id,
    };
    let limit = params::limit(query.limit.as_deref())?;

    let appointments = db::appointments::list(&state.pool, filter, limit).await?;
    Ok(Json(appointments))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Appointment>, AppError> {
    let id = params::path(id)?;
    let appointment = db::appointments::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(appointment))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<AppointmentPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let input = params::json_body(payload)?.into_input()?;
    check_references(&state, &input).await?;

    let appointment = db::appointments::create(&state.pool, &input, auth.user_id)
        .await
        .map_err(|e| AppError::from_write(e, "Appointment already exists"))?;

    tracing::info!(
        user_id = auth.user_id,
        appointment_id = appointment.id,
        "Appointment created"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AppointmentPayload>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    let id = params::path(id)?;
    let input = params::json_body(payload)?.into_input()?;
    db::appointments::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    check_references(&state, &input).await?;

    let appointment = db::appointments::update(&state.pool, id, &input)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            e => AppError::from_write(e, "Appointment already exists"),
        })?;

    tracing::info!(user_id = auth.user_id, appointment_id = id, "Appointment updated");
    Ok(Json(appointment))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = params::path(id)?;
    if !db::appointments::delete(&state.pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, appointment_id = id, "Appointment deleted");
    Ok(Json(serde_json::json!({ "message": "Appointment deleted" })))
}
