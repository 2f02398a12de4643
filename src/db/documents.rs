use sqlx::PgPool;

use crate::db::filter::ListQuery;
use crate::models::{Document, NewDocument};

#[derive(Debug, Default)]
pub struct DocumentFilter {
    pub process_id: Option<i64>,
    pub client_id: Option<i64>,
}

pub async fn list(
    pool: &PgPool,
    filter: DocumentFilter,
    limit: Option<i64>,
) -> Result<Vec<Document>, sqlx::Error> {
    ListQuery::new("documents")
        .eq("process_id", filter.process_id)
        .eq("client_id", filter.client_id)
        .fetch_all(pool, "created_at DESC", limit)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Document>, sqlx::Error> {
    sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, doc: &NewDocument) -> Result<Document, sqlx::Error> {
    sqlx::query_as::<_, Document>(
        "INSERT INTO documents (filename, filepath, original_filename, mime_type,
             size_bytes, process_id, client_id, user_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(&doc.filename)
    .bind(&doc.filepath)
    .bind(&doc.original_filename)
    .bind(&doc.mime_type)
    .bind(doc.size_bytes)
    .bind(doc.process_id)
    .bind(doc.client_id)
    .bind(doc.user_id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
