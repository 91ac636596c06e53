//! Search handlers.

use axum::Json;
use axum::extract::{Query, State};
use serde_json::{Value, json};

use adrive_service::SearchQuery;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/search?q=...&type=...
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, ApiError> {
    let results = state.search_service.search(&auth, &query).await?;
    Ok(Json(json!({ "success": true, "data": results })))
}

/// GET /api/search/file-types
pub async fn file_types(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let summary = state.search_service.file_types(&auth).await?;
    Ok(Json(json!({ "success": true, "data": summary })))
}
