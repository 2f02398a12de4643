use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

/// Caller identity proven by a valid bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Pull the token out of an `Authorization` value of the form `Bearer <token>`.
/// The scheme is matched case-insensitively and exactly two parts are required.
pub fn bearer_token(header: &str) -> Result<&str, AppError> {
    let mut parts = header.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AppError::Unauthorized("Malformed token".to_string()));
    };

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AppError::Unauthorized("Malformed token".to_string()));
    }

    Ok(token)
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Token not provided".to_string()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Malformed token".to_string()))?;

        let token = bearer_token(header)?;

        let claims = jwt::decode_token(token, &state.config.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {e}");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(AuthUser { user_id: claims.id })
    }
}
