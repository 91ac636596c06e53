//! Folder CRUD, tree and archive handlers.

use std::collections::HashMap;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Value, json};

use adrive_core::types::FolderId;

use crate::dto::request::{CreateFolderRequest, MoveRequest, RenameRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

fn folder_id(raw: &str) -> Result<FolderId, ApiError> {
    Ok(parse_id(raw, "folder ID")?)
}

/// GET /api/folders/contents?folder_id=...
pub async fn list_contents(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let parent = params
        .get("folder_id")
        .filter(|raw| !raw.is_empty())
        .map(|raw| folder_id(raw))
        .transpose()?;

    let contents = state.folder_service.list_contents(&auth, parent).await?;
    Ok(Json(json!({ "success": true, "data": contents })))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let folder = state.folder_service.create_folder(&auth, req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": folder })),
    ))
}

/// GET /api/folders/tree
pub async fn get_tree(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let tree = state.tree_service.get_tree(&auth).await?;
    Ok(Json(json!({ "success": true, "data": tree })))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let folder = state
        .folder_service
        .get_folder(&auth, folder_id(&id)?)
        .await?;
    Ok(Json(json!({ "success": true, "data": folder })))
}

/// PUT /api/folders/{id}
pub async fn rename_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<RenameRequest>,
) -> Result<Json<Value>, ApiError> {
    let folder = state
        .folder_service
        .rename_folder(&auth, folder_id(&id)?, &req.name)
        .await?;
    Ok(Json(json!({ "success": true, "data": folder })))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<MoveRequest>,
) -> Result<Json<Value>, ApiError> {
    let folder = state
        .folder_service
        .move_folder(&auth, folder_id(&id)?, req.target_folder_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": folder })))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .folder_service
        .delete_folder(&auth, folder_id(&id)?)
        .await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Folder deleted" } }),
    ))
}

/// GET /api/folders/{id}/breadcrumbs
pub async fn get_breadcrumbs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let crumbs = state
        .tree_service
        .get_breadcrumbs(&auth, folder_id(&id)?)
        .await?;
    Ok(Json(json!({ "success": true, "data": crumbs })))
}

/// GET /api/folders/{id}/archive
pub async fn archive_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let archive = state
        .folder_service
        .archive_folder(&auth, folder_id(&id)?)
        .await?;

    Ok(super::attachment(
        "application/zip",
        &archive.filename,
        Some(archive.size_bytes),
        Body::from_stream(archive.stream),
    )?)
}
