//! CORS layer configuration.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};

use adrive_core::config::CorsConfig;

/// Response headers browser clients may read: the download name and the
/// bulk download counters.
const EXPOSED_HEADERS: [HeaderName; 3] = [
    header::CONTENT_DISPOSITION,
    HeaderName::from_static("x-bulk-processed"),
    HeaderName::from_static("x-bulk-failed"),
];

/// Builds a CORS tower layer from configuration. Unparseable entries are skipped.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = if is_wildcard(&config.allowed_origins) {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(parse_all::<HeaderValue>(&config.allowed_origins))
    };

    let layer = if is_wildcard(&config.allowed_headers) {
        layer.allow_headers(Any)
    } else {
        layer.allow_headers(parse_all::<HeaderName>(&config.allowed_headers))
    };

    layer
        .allow_methods(parse_all::<Method>(&config.allowed_methods))
        .expose_headers(EXPOSED_HEADERS)
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

fn parse_all<T: FromStr>(values: &[String]) -> Vec<T> {
    values.iter().filter_map(|v| v.parse().ok()).collect()
}
