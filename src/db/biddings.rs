use sqlx::PgPool;

use crate::db::filter::ListQuery;
use crate::models::{BiddingInput, BiddingRecord, BiddingStatus};

pub async fn list(
    pool: &PgPool,
    statuses: Vec<BiddingStatus>,
    limit: Option<i64>,
) -> Result<Vec<BiddingRecord>, sqlx::Error> {
    ListQuery::new("licitacoes")
        .any_of("status", statuses)
        .fetch_all(pool, "deadline_date ASC", limit)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<BiddingRecord>, sqlx::Error> {
    sqlx::query_as::<_, BiddingRecord>("SELECT * FROM licitacoes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &BiddingInput) -> Result<BiddingRecord, sqlx::Error> {
    sqlx::query_as::<_, BiddingRecord>(
        "INSERT INTO licitacoes
             (edital_number, organ, object, publication_date, deadline_date, status, description)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(input.edital_number.as_deref())
    .bind(&input.organ)
    .bind(&input.object)
    .bind(input.publication_date)
    .bind(input.deadline_date)
    .bind(input.status)
    .bind(input.description.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    input: &BiddingInput,
) -> Result<BiddingRecord, sqlx::Error> {
    sqlx::query_as::<_, BiddingRecord>(
        "UPDATE licitacoes SET edital_number = $2, organ = $3, object = $4,
             publication_date = $5, deadline_date = $6, status = $7, description = $8,
             updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(input.edital_number.as_deref())
    .bind(&input.organ)
    .bind(&input.object)
    .bind(input.publication_date)
    .bind(input.deadline_date)
    .bind(input.status)
    .bind(input.description.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM licitacoes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
