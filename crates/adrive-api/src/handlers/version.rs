//! File versioning handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Value, json};

use adrive_core::error::AppError;

use super::file::{FilePart, file_id, multipart_error};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

fn version_number(raw: &str) -> Result<i64, ApiError> {
    let number: i64 = parse_id(raw, "version number")?;
    if number < 1 {
        return Err(AppError::validation(format!("Invalid version number: {raw}")).into());
    }
    Ok(number)
}

/// POST /api/files/{id}/versioning/enable
pub async fn enable_versioning(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let version = state
        .version_service
        .enable_versioning(&auth, file_id(&id)?)
        .await?;
    Ok(Json(json!({ "success": true, "data": version })))
}

/// POST /api/files/{id}/versioning/disable
pub async fn disable_versioning(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let file = state
        .version_service
        .disable_versioning(&auth, file_id(&id)?)
        .await?;
    Ok(Json(json!({ "success": true, "data": file })))
}

/// GET /api/files/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let versions = state
        .version_service
        .list_versions(&auth, file_id(&id)?)
        .await?;
    Ok(Json(json!({ "success": true, "data": versions })))
}

/// POST /api/files/{id}/versions
pub async fn create_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = file_id(&id)?;
    let mut comment: Option<String> = None;
    let mut part: Option<FilePart> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "comment" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                comment = Some(text).filter(|c| !c.trim().is_empty());
            }
            "file" => part = Some(FilePart::read(field).await?),
            _ => {}
        }
    }

    let part = part.ok_or_else(|| AppError::validation("file is required"))?;
    let version = state
        .version_service
        .create_new_version(&auth, id, part.data, comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": version })),
    ))
}

/// POST /api/files/{id}/versions/{version}/restore
pub async fn restore_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, version)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let file = state
        .version_service
        .restore_version(&auth, file_id(&id)?, version_number(&version)?)
        .await?;
    Ok(Json(json!({ "success": true, "data": file })))
}

/// GET /api/files/{id}/versions/{version}/download
pub async fn download_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, version)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let result = state
        .version_service
        .download_version(&auth, file_id(&id)?, version_number(&version)?)
        .await?;

    Ok(super::attachment(
        &result.content_type,
        &result.filename,
        Some(result.size_bytes),
        Body::from_stream(result.stream),
    )?)
}
