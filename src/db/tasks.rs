use sqlx::PgPool;

use crate::db::filter::ListQuery;
use crate::models::{Task, TaskInput, TaskStatus};

#[derive(Debug, Default)]
pub struct TaskFilter {
    pub statuses: Vec<TaskStatus>,
    pub assigned_user_id: Option<i64>,
    pub process_id: Option<i64>,
    pub client_id: Option<i64>,
}

pub async fn list(
    pool: &PgPool,
    filter: TaskFilter,
    limit: Option<i64>,
) -> Result<Vec<Task>, sqlx::Error> {
    ListQuery::new("tasks")
        .any_of("status", filter.statuses)
        .eq("assigned_user_id", filter.assigned_user_id)
        .eq("process_id", filter.process_id)
        .eq("client_id", filter.client_id)
        .fetch_all(pool, "due_date ASC", limit)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &TaskInput) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks
             (title, description, due_date, status, assigned_user_id, process_id, client_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&input.title)
    .bind(input.description.as_deref())
    .bind(input.due_date)
    .bind(input.status)
    .bind(input.assigned_user_id)
    .bind(input.process_id)
    .bind(input.client_id)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i64, input: &TaskInput) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET title = $2, description = $3, due_date = $4, status = $5,
             assigned_user_id = $6, process_id = $7, client_id = $8, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.title)
    .bind(input.description.as_deref())
    .bind(input.due_date)
    .bind(input.status)
    .bind(input.assigned_user_id)
    .bind(input.process_id)
    .bind(input.client_id)
    .fetch_one(pool)
    .await
}

pub async fn update_status(pool: &PgPool, id: i64, status: TaskStatus) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
