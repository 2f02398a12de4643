use sqlx::PgPool;

use crate::db::filter::ListQuery;
use crate::models::{Appointment, AppointmentInput};

#[derive(Debug, Default)]
pub struct AppointmentFilter {
    pub process_id: Option<i64>,
    pub client_id: Option<i64>,
}

pub async fn list(
    pool: &PgPool,
    filter: AppointmentFilter,
    limit: Option<i64>,
) -> Result<Vec<Appointment>, sqlx::Error> {
    ListQuery::new("appointments")
        .eq("process_id", filter.process_id)
        .eq("client_id", filter.client_id)
        .fetch_all(pool, "start_time ASC", limit)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Appointment>, sqlx::Error> {
    sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    input: &AppointmentInput,
    user_id: i64,
) -> Result<Appointment, sqlx::Error> {
    sqlx::query_as::<_, Appointment>(
        "INSERT INTO appointments
             (title, description, start_time, end_time, process_id, client_id, user_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&input.title)
    .bind(input.description.as_deref())
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.process_id)
    .bind(input.client_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// The creator (`user_id`) is never rewritten.
pub async fn update(
    pool: &PgPool,
    id: i64,
    input: &AppointmentInput,
) -> Result<Appointment, sqlx::Error> {
    sqlx::query_as::<_, Appointment>(
        "UPDATE appointments SET title = $2, description = $3, start_time = $4,
             end_time = $5, process_id = $6, client_id = $7, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.title)
    .bind(input.description.as_deref())
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(input.process_id)
    .bind(input.client_id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
