use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::auth::guard::{self, UserAction};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{Role, User, UserChanges};
use crate::routes::params;
use crate::state::SharedState;
use crate::validation::fields;
use crate::validation::uniqueness::{self, UniqueKey};

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub role: Option<Role>,
}

/// Every field is optional; only the supplied ones are written.
#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub role: Option<Role>,
}

fn not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    guard::require(&state.pool, &auth, UserAction::ListAll).await?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    guard::require(&state.pool, &auth, UserAction::Create).await?;

    let req = params::json_body(payload)?;
    let name = fields::required(req.name, "name")?;
    let email = fields::required(req.email, "email")?;
    let plain = fields::mandatory(req.password.filter(|p| !p.is_empty()), "password")?;
    password::check_length(&plain)?;

    uniqueness::ensure(&state.pool, UniqueKey::UserEmail, &email, None).await?;

    let pw_hash = password::hash(&plain).map_err(AppError::Internal)?;
    let user = db::users::create(
        &state.pool,
        &name,
        &email,
        &pw_hash,
        req.role.unwrap_or_default(),
    )
    .await
    .map_err(|e| AppError::from_write(e, UniqueKey::UserEmail.message()))?;

    tracing::info!(user_id = auth.user_id, created_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let id = params::path(id)?;
    guard::require(&state.pool, &auth, UserAction::View(id)).await?;
    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(user))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let id = params::path(id)?;
    let caller_role = guard::require(&state.pool, &auth, UserAction::Update(id)).await?;
    let req = params::json_body(payload)?;

    db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let mut changes = UserChanges {
        name: fields::optional(req.name),
        email: fields::optional(req.email),
        password_hash: None,
        role: guard::permitted_role_change(caller_role, req.role),
    };

    if let Some(email) = &changes.email {
        uniqueness::ensure(&state.pool, UniqueKey::UserEmail, email, Some(id)).await?;
    }

    if let Some(plain) = req.password.filter(|p| !p.is_empty()) {
        password::check_length(&plain)?;
        changes.password_hash = Some(password::hash(&plain).map_err(AppError::Internal)?);
    }

    if changes.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let user = db::users::update(&state.pool, id, &changes)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            e => AppError::from_write(e, UniqueKey::UserEmail.message()),
        })?;

    tracing::info!(
        user_id = auth.user_id,
        target_id = id,
        role_changed = changes.role.is_some(),
        "User updated"
    );
    Ok(Json(user))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = params::path(id)?;
    guard::require(&state.pool, &auth, UserAction::Delete(id)).await?;

    db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    guard::forbid_self_delete(auth.user_id, id)?;

    if !db::users::delete(&state.pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, target_id = id, "User deleted");
    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}
