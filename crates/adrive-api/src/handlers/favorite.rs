//! Favorites handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use adrive_core::types::FavoriteId;
use adrive_entity::favorite::ItemType;

use crate::dto::request::FavoriteItemRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let favorites = state.favorite_service.list(&auth).await?;
    Ok(Json(json!({ "success": true, "data": favorites })))
}

/// POST /api/favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<FavoriteItemRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let favorite = state
        .favorite_service
        .add(&auth, req.item_type()?, req.item_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": favorite })),
    ))
}

/// DELETE /api/favorites/{id}
pub async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id: FavoriteId = parse_id(&id, "favorite ID")?;
    state.favorite_service.remove(&auth, id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Favorite removed" } }),
    ))
}

/// DELETE /api/favorites/item
pub async fn remove_favorite_by_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<FavoriteItemRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .favorite_service
        .remove_by_item(&auth, req.item_type()?, req.item_id)
        .await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Favorite removed" } }),
    ))
}

/// GET /api/favorites/check/{type}/{id}
pub async fn check_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((item_type, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let item_type: ItemType = item_type.parse()?;
    let item_id: i64 = parse_id(&id, "item ID")?;
    let status = state
        .favorite_service
        .check(&auth, item_type, item_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": status })))
}
