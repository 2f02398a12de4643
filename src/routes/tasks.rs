use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::tasks::TaskFilter;
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskStatus};
use crate::routes::params;
use crate::state::SharedState;
use crate::validation::fields;
use crate::validation::references::{self, Reference, Referenced};

#[derive(Deserialize)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub assigned_user_id: Option<i64>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub process_id: Option<i64>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub client_id: Option<i64>,
}

impl TaskPayload {
    fn into_input(self) -> Result<TaskInput, AppError> {
        Ok(TaskInput {
            title: fields::required(self.title, "title")?,
            description: fields::optional(self.description),
            due_date: self.due_date,
            status: self.status.unwrap_or_default(),
            assigned_user_id: self.assigned_user_id,
            process_id: self.process_id,
            client_id: self.client_id,
        })
    }
}

#[derive(Deserialize)]
pub struct StatusPayload {
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub status: Option<TaskStatus>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub assigned_user_id: Option<i64>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub process_id: Option<i64>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub client_id: Option<i64>,
    pub limit: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound("Task not found".to_string())
}

async fn check_references(state: &SharedState, input: &TaskInput) -> Result<(), AppError> {
    references::ensure(
        &state.pool,
        &[
            Reference::new("assigned_user_id", Referenced::User, input.assigned_user_id),
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
) -> Result<Json<Vec<Task>>, AppError> {
    let query = params::query(query)?;
    let filter = TaskFilter {
        statuses: params::status_list(query.status.as_deref())?,
        assigned_user_id: query.assigned_user_id,
        process_id: query.process_id,
        client_id: query.client_id,
    };
    let limit = params::limit(query.limit.as_deref())?;

    let tasks = db::tasks::list(&state.pool, filter, limit).await?;
    Ok(Json(tasks))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Task>, AppError> {
    let id = params::path(id)?;
    let task = db::tasks::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(task))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let input = params::json_body(payload)?.into_input()?;
    check_references(&state, &input).await?;

    let task = db::tasks::create(&state.pool, &input)
        .await
        .map_err(|e| AppError::from_write(e, "Task already exists"))?;

    tracing::info!(user_id = auth.user_id, task_id = task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let id = params::path(id)?;
    let input = params::json_body(payload)?.into_input()?;
    db::tasks::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    check_references(&state, &input).await?;

    let task = db::tasks::update(&state.pool, id, &input)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            e => AppError::from_write(e, "Task already exists"),
        })?;

    tracing::info!(user_id = auth.user_id, task_id = id, "Task updated");
    Ok(Json(task))
}

/// Moves a task through its lifecycle without resending the other fields.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let id = params::path(id)?;
    let status = fields::mandatory(params::json_body(payload)?.status, "status")?;

    let task = db::tasks::update_status(&state.pool, id, status)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            e => AppError::Database(e),
        })?;

    tracing::info!(user_id = auth.user_id, task_id = id, ?status, "Task status changed");
    Ok(Json(task))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = params::path(id)?;
    if !db::tasks::delete(&state.pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, task_id = id, "Task deleted");
    Ok(Json(serde_json::json!({ "message": "Task deleted" })))
}
