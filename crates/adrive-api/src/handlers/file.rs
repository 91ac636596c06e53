//! File upload, download and metadata handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use bytes::Bytes;
use serde_json::{Value, json};

use adrive_core::error::AppError;
use adrive_core::types::{FileId, FolderId};
use adrive_service::UploadRequest;

use crate::dto::request::{MoveRequest, RenameRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

pub(crate) fn file_id(raw: &str) -> Result<FileId, ApiError> {
    Ok(parse_id(raw, "file ID")?)
}

/// The `file` part of a multipart body.
#[derive(Debug)]
pub(crate) struct FilePart {
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub data: Bytes,
}

impl FilePart {
    pub(crate) async fn read(field: axum::extract::multipart::Field<'_>) -> Result<Self, AppError> {
        let file_name = field.file_name().map(String::from);
        let mime_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        Ok(Self {
            file_name,
            mime_type,
            data,
        })
    }
}

pub(crate) fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::validation(format!("Multipart error: {e}"))
}

/// POST /api/files/upload
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut folder_id: Option<FolderId> = None;
    let mut part: Option<FilePart> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "folder_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    folder_id = Some(parse_id(text, "folder ID")?);
                }
            }
            "file" => part = Some(FilePart::read(field).await?),
            _ => {}
        }
    }

    let part = part.ok_or_else(|| AppError::validation("file is required"))?;
    let file_name = part
        .file_name
        .ok_or_else(|| AppError::validation("file name is required"))?;

    let file = state
        .upload_service
        .upload(
            &auth,
            UploadRequest {
                folder_id,
                file_name,
                mime_type: part.mime_type,
                data: part.data,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": file })),
    ))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let file = state.file_service.get_file(&auth, file_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "data": file })))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .download_service
        .download(&auth, file_id(&id)?)
        .await?;

    Ok(super::attachment(
        &result.content_type,
        &result.filename,
        Some(result.size_bytes),
        Body::from_stream(result.stream),
    )?)
}

/// PUT /api/files/{id}
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RenameRequest>,
) -> Result<Json<Value>, ApiError> {
    let file = state
        .file_service
        .rename_file(&auth, file_id(&id)?, &req.name)
        .await?;
    Ok(Json(json!({ "success": true, "data": file })))
}

/// PUT /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<MoveRequest>,
) -> Result<Json<Value>, ApiError> {
    let file = state
        .file_service
        .move_file(&auth, file_id(&id)?, req.target_folder_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": file })))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.file_service.delete_file(&auth, file_id(&id)?).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "File deleted" } }),
    ))
}
