//! HTTP request handlers, one module per resource.

pub mod bulk;
pub mod favorite;
pub mod file;
pub mod folder;
pub mod health;
pub mod recent;
pub mod search;
pub mod version;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;

use adrive_core::error::AppError;

/// Builds an attachment response with a download filename.
pub(crate) fn attachment(
    content_type: &str,
    filename: &str,
    content_length: Option<u64>,
    body: Body,
) -> Result<Response, AppError> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, content_disposition(filename));

    if let Some(len) = content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    builder
        .body(body)
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 UTF-8 name.
pub(crate) fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
