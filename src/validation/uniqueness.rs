use sqlx::PgPool;

use crate::db;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    ClientTaxId,
    ProcessNumber,
    UserEmail,
}

impl UniqueKey {
    fn table(self) -> &'static str {
        match self {
            UniqueKey::ClientTaxId => "clients",
            UniqueKey::ProcessNumber => "processes",
            UniqueKey::UserEmail => "users",
        }
    }

    fn column(self) -> &'static str {
        match self {
            UniqueKey::ClientTaxId => "cpf_cnpj",
            UniqueKey::ProcessNumber => "process_number",
            UniqueKey::UserEmail => "email",
        }
    }

    /// Also used when the UNIQUE constraint itself fires.
    pub fn message(self) -> &'static str {
        match self {
            UniqueKey::ClientTaxId => "CPF/CNPJ already registered",
            UniqueKey::ProcessNumber => "Process number already registered",
            UniqueKey::UserEmail => "Email already registered",
        }
    }
}

/// `except` is the id of the row being updated, which may keep its own value.
pub async fn ensure(
    pool: &PgPool,
    key: UniqueKey,
    value: &str,
    except: Option<i64>,
) -> Result<(), AppError> {
    if db::lookup::key_taken(pool, key.table(), key.column(), value, except).await? {
        return Err(AppError::Conflict(key.message().to_string()));
    }
    Ok(())
}
