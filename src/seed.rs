//! Start-up bootstrap of the first administrator account.

use sqlx::PgPool;

use crate::auth::password;
use crate::config::AdminSeed;
use crate::db;
use crate::models::Role;

/// Create the configured administrator unless the email is already taken.
/// Returns whether a user was created.
pub async fn ensure_admin(pool: &PgPool, seed: &AdminSeed) -> Result<bool, String> {
    let existing = db::users::find_by_email(pool, &seed.email)
        .await
        .map_err(|e| format!("Admin lookup failed: {e}"))?;
    if existing.is_some() {
        tracing::debug!(email = %seed.email, "Admin account already present");
        return Ok(false);
    }

    if seed.password.chars().count() < password::MIN_LENGTH {
        return Err(format!(
            "JURIDICO_ADMIN_PASSWORD must be at least {} characters",
            password::MIN_LENGTH
        ));
    }

    let pw_hash = password::hash(&seed.password)?;
    let user = db::users::create(pool, &seed.name, &seed.email, &pw_hash, Role::Admin)
        .await
        .map_err(|e| format!("Failed to create admin: {e}"))?;

    tracing::info!(user_id = user.id, email = %user.email, "Admin account created");
    Ok(true)
}
