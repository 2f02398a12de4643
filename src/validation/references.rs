//! Pre-write checks that foreign ids point at existing rows.

use sqlx::PgPool;

use crate::db;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Referenced {
    Client,
    Process,
    User,
}

impl Referenced {
    fn table(self) -> &'static str {
        match self {
            Referenced::Client => "clients",
            Referenced::Process => "processes",
            Referenced::User => "users",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Referenced::Client => "Client",
            Referenced::Process => "Process",
            Referenced::User => "User",
        }
    }
}

/// One foreign id carried by a write. Absent ids are not checked.
#[derive(Debug, Clone, Copy)]
pub struct Reference {
    pub field: &'static str,
    pub target: Referenced,
    pub id: Option<i64>,
}

impl Reference {
    pub fn new(field: &'static str, target: Referenced, id: Option<i64>) -> Self {
        Self { field, target, id }
    }
}

/// Fails with `InvalidReference` on the first id that has no row.
pub async fn ensure(pool: &PgPool, references: &[Reference]) -> Result<(), AppError> {
    for reference in references {
        let Some(id) = reference.id else {
            continue;
        };
        if !db::lookup::exists(pool, reference.target.table(), id).await? {
            tracing::debug!(field = reference.field, id, "Reference to missing row");
            return Err(AppError::InvalidReference(reference.target.label()));
        }
    }
    Ok(())
}

/// Appointments and documents must hang off a process, a client, or both.
pub fn require_link(
    process_id: Option<i64>,
    client_id: Option<i64>,
    what: &str,
) -> Result<(), AppError> {
    if process_id.is_none() && client_id.is_none() {
        return Err(AppError::Validation(format!(
            "{what} must be linked to a process or a client"
        )));
    }
    Ok(())
}
