use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::processes::ProcessFilter;
use crate::error::AppError;
use crate::models::{Process, ProcessInput, ProcessStatus};
use crate::routes::params;
use crate::state::SharedState;
use crate::validation::fields;
use crate::validation::references::{self, Reference, Referenced};
use crate::validation::uniqueness::{self, UniqueKey};

#[derive(Deserialize)]
pub struct ProcessPayload {
    pub process_number: Option<String>,
    pub court: Option<String>,
    pub district: Option<String>,
    pub action_type: Option<String>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub status: Option<ProcessStatus>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub client_id: Option<i64>,
    pub description: Option<String>,
}

impl ProcessPayload {
    fn into_input(self) -> Result<ProcessInput, AppError> {
        Ok(ProcessInput {
            process_number: fields::required(self.process_number, "process_number")?,
            court: fields::optional(self.court),
            district: fields::optional(self.district),
            action_type: fields::optional(self.action_type),
            status: self.status.unwrap_or_default(),
            client_id: self.client_id,
            description: fields::optional(self.description),
        })
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub client_id: Option<i64>,
    pub limit: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound("Process not found".to_string())
}

async fn validate(
    state: &SharedState,
    input: &ProcessInput,
    except: Option<i64>,
) -> Result<(), AppError> {
    uniqueness::ensure(&state.pool, UniqueKey::ProcessNumber, &input.process_number, except).await?;
    references::ensure(
        &state.pool,
        &[Reference::new("client_id", Referenced::Client, input.client_id)],
    )
    .await
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Process>>, AppError> {
    let query = params::query(query)?;
    let filter = ProcessFilter {
        statuses: params::status_list(query.status.as_deref())?,
        client_id: query.client_id,
    };
    let limit = params::limit(query.limit.as_deref())?;

    let processes = db::processes::list(&state.pool, filter, limit).await?;
    Ok(Json(processes))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Process>, AppError> {
    let id = params::path(id)?;
    let process = db::processes::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(process))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<ProcessPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Process>), AppError> {
    let input = params::json_body(payload)?.into_input()?;
    validate(&state, &input, None).await?;

    let process = db::processes::create(&state.pool, &input)
        .await
        .map_err(|e| AppError::from_write(e, UniqueKey::ProcessNumber.message()))?;

    tracing::info!(user_id = auth.user_id, process_id = process.id, "Process created");
    Ok((StatusCode::CREATED, Json(process)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProcessPayload>, JsonRejection>,
) -> Result<Json<Process>, AppError> {
    let id = params::path(id)?;
    let input = params::json_body(payload)?.into_input()?;
    db::processes::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    validate(&state, &input, Some(id)).await?;

    let process = db::processes::update(&state.pool, id, &input)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            e => AppError::from_write(e, UniqueKey::ProcessNumber.message()),
        })?;

    tracing::info!(user_id = auth.user_id, process_id = id, "Process updated");
    Ok(Json(process))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = params::path(id)?;
    if !db::processes::delete(&state.pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, process_id = id, "Process deleted");
    Ok(Json(serde_json::json!({ "message": "Process deleted" })))
}
