//! Existence probes shared by the referential and uniqueness validators.
//! Table and column names always come from closed enums, never from input.

use sqlx::PgPool;

pub async fn exists(pool: &PgPool, table: &'static str, id: i64) -> Result<bool, sqlx::Error> {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)");
    sqlx::query_scalar::<_, bool>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Whether another row already holds `value` in `column`. `except` excludes
/// the row being updated.
pub async fn key_taken(
    pool: &PgPool,
    table: &'static str,
    column: &'static str,
    value: &str,
    except: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {table} WHERE {column} = $1 AND ($2::BIGINT IS NULL OR id <> $2))"
    );
    sqlx::query_scalar::<_, bool>(&sql)
        .bind(value)
        .bind(except)
        .fetch_one(pool)
        .await
}
