//! Bulk delete, move and download.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};

use adrive_service::{BulkOutcome, BulkRequest};

use crate::dto::request::BulkOperationRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/bulk
///
/// `delete` and `move` answer with the per-item result. `download`
/// answers with a zip body; its counters travel in `X-Bulk-Processed`
/// and `X-Bulk-Failed`.
pub async fn bulk_operation(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<BulkOperationRequest>,
) -> Result<Response, ApiError> {
    let req = BulkRequest::try_from(req)?;

    match state.bulk_service.execute(&auth, req).await? {
        BulkOutcome::Completed(result) => Ok(Json(result).into_response()),
        BulkOutcome::Archive(download) => {
            let archive = download.archive;
            let mut response = super::attachment(
                "application/zip",
                &archive.filename,
                Some(archive.size_bytes),
                Body::from_stream(archive.stream),
            )?;
            let headers = response.headers_mut();
            headers.insert("x-bulk-processed", HeaderValue::from(download.result.processed));
            headers.insert("x-bulk-failed", HeaderValue::from(download.result.failed));
            Ok(response)
        }
    }
}
