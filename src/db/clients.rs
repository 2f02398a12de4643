use sqlx::PgPool;

use crate::db::filter::ListQuery;
use crate::models::{Client, ClientInput};

pub async fn list(pool: &PgPool, limit: Option<i64>) -> Result<Vec<Client>, sqlx::Error> {
    ListQuery::new("clients").fetch_all(pool, "name", limit).await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &ClientInput) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "INSERT INTO clients (name, client_type, cpf_cnpj, email, phone, address)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&input.name)
    .bind(input.client_type)
    .bind(&input.cpf_cnpj)
    .bind(input.email.as_deref())
    .bind(input.phone.as_deref())
    .bind(input.address.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i64, input: &ClientInput) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "UPDATE clients SET name = $2, client_type = $3, cpf_cnpj = $4,
             email = $5, phone = $6, address = $7, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&input.name)
    .bind(input.client_type)
    .bind(&input.cpf_cnpj)
    .bind(input.email.as_deref())
    .bind(input.phone.as_deref())
    .bind(input.address.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
