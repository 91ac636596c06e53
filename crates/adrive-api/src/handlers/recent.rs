//! Recent access handlers.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};

use adrive_entity::favorite::ItemType;

use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_id};
use crate::state::AppState;

/// GET /api/recent?limit=...
pub async fn recent_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let limit = params
        .get("limit")
        .map(|raw| parse_id::<i64>(raw, "limit"))
        .transpose()?;

    let items = state.recent_service.recent_items(&auth, limit).await?;
    Ok(Json(json!({ "success": true, "data": items })))
}

/// POST /api/recent/{type}/{id}
pub async fn track_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((item_type, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let item_type: ItemType = item_type.parse()?;
    let item_id: i64 = parse_id(&id, "item ID")?;
    let access = state
        .recent_service
        .track(&auth, item_type, item_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": access })))
}
