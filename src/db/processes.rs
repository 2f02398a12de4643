use sqlx::PgPool;

use crate::db::filter::ListQuery;
use crate::models::{Process, ProcessInput, ProcessStatus};

#[derive(Debug, Default)]
pub struct ProcessFilter {
    pub statuses: Vec<ProcessStatus>,
    pub client_id: Option<i64>,
}

pub async fn list(
    pool: &PgPool,
    filter: ProcessFilter,
    limit: Option<i64>,
) -> Result<Vec<Process>, sqlx::Error> {
    ListQuery::new("processes")
        .any_of("status", filter.statuses)
        .eq("client_id", filter.client_id)
        .fetch_all(pool, "created_at DESC", limit)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Process>, sqlx::Error> {
    sqlx::query_as::<_, Process>("SELECT * FROM processes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn count_by_client(pool: &PgPool, client_id: i64) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM processes WHERE client_id = $1")
        .bind(client_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn create(pool: &PgPool, input: &ProcessInput) -> Result<Process, sqlx::Error> {
    sqlx::query_as::<_, Process>(
        "INSERT INTO processes
             (process_number, court, district, action_type, status, client_id, description)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&input.process_number)
    .bind(input.court.as_deref())
    .bind(input.district.as_deref())
    .bind(input.action_type.as_deref())
    .bind(input.status)
    .bind(input.client_id)
    .bind(input.description.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i64, input: &ProcessInput) -> Result<Process, sqlx::Error> {
    sqlx::query_as::<_, Process>(
        "UPDATE processes SET process_number = $2, court = $3, district = $4,
             action_type = $5, status = $6, client_id = $7, description = $8,
             updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.process_number)
    .bind(input.court.as_deref())
    .bind(input.district.as_deref())
    .bind(input.action_type.as_deref())
    .bind(input.status)
    .bind(input.client_id)
    .bind(input.description.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM processes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
