//! Health check handlers. Neither needs a token.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::warn;

use crate::dto::response::{HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "success": true, "data": HealthResponse::current() }))
}

/// GET /api/health/ready
///
/// Answers 503 while the database or the storage root is unusable.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database_ok = state.db.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Database readiness check failed");
        false
    });
    let storage_ok = state.storage.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Storage readiness check failed");
        false
    });

    let readiness = ReadinessResponse::from_checks(database_ok, storage_ok);
    let status = if readiness.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({ "success": readiness.is_ready(), "data": readiness })),
    )
}
