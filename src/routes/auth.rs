use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::config::RegistrationMode;
use crate::db;
use crate::error::AppError;
use crate::models::{Role, User};
use crate::routes::params;
use crate::state::SharedState;
use crate::validation::fields;
use crate::validation::uniqueness::{self, UniqueKey};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "params::blank_as_none")]
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

fn issue(state: &SharedState, user: User) -> Result<AuthResponse, AppError> {
    let claims = Claims::new(&user, state.config.jwt_ttl_minutes);
    let token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;
    Ok(AuthResponse { token, user })
}

pub async fn register(
    State(state): State<SharedState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if state.config.registration == RegistrationMode::Closed {
        return Err(AppError::Forbidden(
            "Registration is disabled. Contact your system administrator.".to_string(),
        ));
    }

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

    tracing::info!(user_id = user.id, role = ?user.role, "User registered");
    Ok((StatusCode::CREATED, Json(issue(&state, user)?)))
}

/// Unknown email and wrong password produce the same response.
pub async fn login(
    State(state): State<SharedState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let req = params::json_body(payload)?;
    let email = fields::required(req.email, "email")?;
    let plain = fields::mandatory(req.password.filter(|p| !p.is_empty()), "password")?;

    if let Err(retry_after) = state.login_limiter.check(&email) {
        tracing::warn!(retry_after, "Login throttled");
        return Err(AppError::RateLimited(format!(
            "Too many login attempts. Try again in {} minutes.",
            retry_after.div_ceil(60)
        )));
    }

    let Some(user) = db::users::find_by_email(&state.pool, &email).await? else {
        state.login_limiter.record_failure(&email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let valid = password::verify(&plain, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(&email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    state.login_limiter.reset(&email);
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(issue(&state, user)?))
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<User>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}
