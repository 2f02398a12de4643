use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Client, ClientInput, ClientType};
use crate::routes::params;
use crate::state::SharedState;
use crate::validation::fields;
use crate::validation::uniqueness::{self, UniqueKey};

#[derive(Deserialize)]
pub struct ClientPayload {
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "params::blank_as_none")]
    pub client_type: Option<ClientType>,
    pub cpf_cnpj: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ClientPayload {
    fn into_input(self) -> Result<ClientInput, AppError> {
        Ok(ClientInput {
            name: fields::required(self.name, "name")?,
            client_type: fields::mandatory(self.client_type, "type")?,
            cpf_cnpj: fields::required(self.cpf_cnpj, "cpf_cnpj")?,
            email: fields::optional(self.email),
            phone: fields::optional(self.phone),
            address: fields::optional(self.address),
        })
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
}

fn not_found() -> AppError {
    AppError::NotFound("Client not found".to_string())
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Client>>, AppError> {
    let query = params::query(query)?;
    let limit = params::limit(query.limit.as_deref())?;
    let clients = db::clients::list(&state.pool, limit).await?;
    Ok(Json(clients))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Client>, AppError> {
    let id = params::path(id)?;
    let client = db::clients::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(client))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<ClientPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let input = params::json_body(payload)?.into_input()?;
    uniqueness::ensure(&state.pool, UniqueKey::ClientTaxId, &input.cpf_cnpj, None).await?;

    let client = db::clients::create(&state.pool, &input)
        .await
        .map_err(|e| AppError::from_write(e, UniqueKey::ClientTaxId.message()))?;

    tracing::info!(user_id = auth.user_id, client_id = client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ClientPayload>, JsonRejection>,
) -> Result<Json<Client>, AppError> {
    let id = params::path(id)?;
    let input = params::json_body(payload)?.into_input()?;
    db::clients::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    uniqueness::ensure(&state.pool, UniqueKey::ClientTaxId, &input.cpf_cnpj, Some(id)).await?;

    let client = db::clients::update(&state.pool, id, &input)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => not_found(),
            e => AppError::from_write(e, UniqueKey::ClientTaxId.message()),
        })?;

    tracing::info!(user_id = auth.user_id, client_id = id, "Client updated");
    Ok(Json(client))
}

/// Refused while processes still reference the client; the response carries
/// their count.
pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = params::path(id)?;
    db::clients::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let linked = db::processes::count_by_client(&state.pool, id).await?;
    if linked > 0 {
        return Err(in_use(linked));
    }

    let deleted = match db::clients::delete(&state.pool, id).await {
        Ok(deleted) => deleted,
        // A process was linked between the count and the delete.
        Err(sqlx::Error::Database(ref db_err)) if db_err.is_foreign_key_violation() => {
            let linked = db::processes::count_by_client(&state.pool, id).await?;
            return Err(in_use(linked));
        }
        Err(e) => return Err(e.into()),
    };
    if !deleted {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, client_id = id, "Client deleted");
    Ok(Json(serde_json::json!({ "message": "Client deleted" })))
}

fn in_use(count: i64) -> AppError {
    AppError::InUse {
        message: "Client has linked processes and cannot be deleted".to_string(),
        entity: "processes",
        count,
    }
}
