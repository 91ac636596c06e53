//! Access log for every request.

use std::time::Instant;

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Level, debug, info, warn};

/// Emits one event per request with its status, latency and response size.
///
/// Health probes are logged at debug level, server errors at warn.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let bytes = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    match level_for(&path, response.status().is_server_error()) {
        Level::WARN => warn!(%method, %path, status, elapsed_ms, ?bytes, "Request failed"),
        Level::DEBUG => debug!(%method, %path, status, elapsed_ms, "Probe served"),
        _ => info!(%method, %path, status, elapsed_ms, ?bytes, "Request served"),
    }

    response
}

fn level_for(path: &str, server_error: bool) -> Level {
    if server_error {
        Level::WARN
    } else if path.starts_with("/api/health") {
        Level::DEBUG
    } else {
        Level::INFO
    }
}
