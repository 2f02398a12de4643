use std::path::Path as FsPath;

use axum::body::Body;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use multer::{Constraints, Multipart, SizeLimit};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::db::documents::DocumentFilter;
use crate::error::AppError;
use crate::models::{Document, NewDocument};
use crate::routes::params;
use crate::state::SharedState;
use crate::storage::DocumentStore;
use crate::validation::references::{self, Reference, Referenced};

/// Ceiling for the non-file form fields.
const TEXT_FIELD_LIMIT: u64 = 1024;
const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "params::optional_id")]
    pub process_id: Option<i64>,
    #[serde(default, deserialize_with = "params::optional_id")]
    pub client_id: Option<i64>,
    pub limit: Option<String>,
}

struct UploadedFile {
    original_filename: String,
    mime_type: String,
    bytes: Bytes,
}

#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    process_id: Option<i64>,
    client_id: Option<i64>,
}

fn not_found() -> AppError {
    AppError::NotFound("Document not found".to_string())
}

fn multipart_error(err: multer::Error) -> AppError {
    match err {
        multer::Error::FieldSizeExceeded { limit, .. }
        | multer::Error::StreamSizeExceeded { limit } => {
            AppError::Validation(format!("File exceeds the maximum size of {limit} bytes"))
        }
        other => AppError::Validation(format!("Invalid multipart body: {other}")),
    }
}

/// Buffer the form in memory under the size ceiling. Nothing touches the
/// disk until the links have been validated.
async fn read_upload(headers: &HeaderMap, body: Body, max_size: u64) -> Result<UploadForm, AppError> {
    let boundary = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| AppError::Validation("Expected a multipart/form-data body".to_string()))?;

    let constraints = Constraints::new().size_limit(
        SizeLimit::new()
            .per_field(TEXT_FIELD_LIMIT)
            .for_field("file", max_size),
    );
    let mut multipart =
        Multipart::with_constraints(body.into_data_stream(), boundary, constraints);

    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let original_filename = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "file".to_string());
                let mime_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| DEFAULT_MIME.to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile {
                    original_filename,
                    mime_type,
                    bytes,
                });
            }
            Some("process_id") => {
                let text = field.text().await.map_err(multipart_error)?;
                form.process_id = params::parse_id(&text).map_err(AppError::Validation)?;
            }
            Some("client_id") => {
                let text = field.text().await.map_err(multipart_error)?;
                form.client_id = params::parse_id(&text).map_err(AppError::Validation)?;
            }
            _ => {}
        }
    }

    Ok(form)
}

/// `attachment` disposition with an ASCII fallback name and the RFC 5987
/// encoded original.
fn content_disposition(original: &str) -> String {
    let fallback: String = original
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded: String = original
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect();
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

pub async fn upload(
    auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let form = read_upload(&headers, body, state.config.max_upload_size).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    references::require_link(form.process_id, form.client_id, "Document")?;
    references::ensure(
        &state.pool,
        &[
            Reference::new("process_id", Referenced::Process, form.process_id),
            Reference::new("client_id", Referenced::Client, form.client_id),
        ],
    )
    .await?;

    let filename = DocumentStore::storage_name(&file.original_filename);
    let path = state.documents.save(&filename, &file.bytes).await?;

    let new_document = NewDocument {
        filename,
        filepath: path.to_string_lossy().into_owned(),
        original_filename: file.original_filename,
        mime_type: file.mime_type,
        size_bytes: file.bytes.len() as i64,
        process_id: form.process_id,
        client_id: form.client_id,
        user_id: auth.user_id,
    };

    let document = match db::documents::create(&state.pool, &new_document).await {
        Ok(document) => document,
        Err(e) => {
            if let Err(rm) = state.documents.remove(&path).await {
                tracing::warn!("Failed to remove orphaned upload {}: {rm}", path.display());
            }
            return Err(AppError::from_write(e, "Document already exists"));
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        document_id = document.id,
        size_bytes = document.size_bytes,
        "Document uploaded"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Document>>, AppError> {
    let query = params::query(query)?;
    let filter = DocumentFilter {
        process_id: query.process_id,
        client_id: query.client_id,
    };
    let limit = params::limit(query.limit.as_deref())?;

    let documents = db::documents::list(&state.pool, filter, limit).await?;
    Ok(Json(documents))
}

pub async fn list_by_process(
    _auth: AuthUser,
    State(state): State<SharedState>,
    process_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Document>>, AppError> {
    let process_id = params::path(process_id)?;
    let filter = DocumentFilter {
        process_id: Some(process_id),
        client_id: None,
    };
    let documents = db::documents::list(&state.pool, filter, None).await?;
    Ok(Json(documents))
}

pub async fn list_by_client(
    _auth: AuthUser,
    State(state): State<SharedState>,
    client_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Document>>, AppError> {
    let client_id = params::path(client_id)?;
    let filter = DocumentFilter {
        process_id: None,
        client_id: Some(client_id),
    };
    let documents = db::documents::list(&state.pool, filter, None).await?;
    Ok(Json(documents))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Document>, AppError> {
    let id = params::path(id)?;
    let document = db::documents::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(document))
}

pub async fn download(
    _auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let id = params::path(id)?;
    let document = db::documents::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let file = match state.documents.open(FsPath::new(&document.filepath)).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(document_id = id, "Stored file is missing");
            return Err(AppError::NotFound("File not found on server".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let headers = [
        (CONTENT_TYPE, document.mime_type.clone()),
        (
            CONTENT_DISPOSITION,
            content_disposition(&document.original_filename),
        ),
    ];
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((headers, body).into_response())
}

/// Removes the stored file first, then the row. A file that is already gone
/// does not block the delete.
pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = params::path(id)?;
    let document = db::documents::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    if !state.documents.remove(FsPath::new(&document.filepath)).await? {
        tracing::warn!(document_id = id, "Stored file was already missing");
    }

    if !db::documents::delete(&state.pool, id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = auth.user_id, document_id = id, "Document deleted");
    Ok(Json(serde_json::json!({ "message": "Document deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_keeps_plain_names() {
        assert_eq!(
            content_disposition("contrato.pdf"),
            "attachment; filename=\"contrato.pdf\"; filename*=UTF-8''contrato.pdf"
        );
    }

    #[test]
    fn disposition_escapes_quotes_and_non_ascii() {
        let value = content_disposition("petição \"final\".pdf");
        assert!(value.starts_with("attachment; filename=\"peti__o _final_.pdf\""));
        assert!(value.contains("filename*=UTF-8''peti%C3%A7%C3%A3o%20%22final%22.pdf"));
        assert!(axum::http::HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn oversized_fields_are_validation_errors() {
        let err = multipart_error(multer::Error::StreamSizeExceeded { limit: 10 });
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("10 bytes")));
    }
}
