//! Route definitions for the A-Drive HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart framing on top of the largest accepted upload.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_body = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let timeout = state.config.server.request_timeout();

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(version_routes())
        .merge(bulk_routes())
        .merge(search_routes())
        .merge(favorite_routes())
        .merge(recent_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    #[allow(deprecated)]
    let timeout_layer = TimeoutLayer::new(timeout);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(timeout_layer)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Folder CRUD, browsing and archive
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", post(handlers::folder::create_folder))
        .route("/folders/contents", get(handlers::folder::list_contents))
        .route("/folders/tree", get(handlers::folder::get_tree))
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder)
                .put(handlers::folder::rename_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route("/folders/{id}/move", put(handlers::folder::move_folder))
        .route(
            "/folders/{id}/breadcrumbs",
            get(handlers::folder::get_breadcrumbs),
        )
        .route(
            "/folders/{id}/archive",
            get(handlers::folder::archive_folder),
        )
}

/// File upload, download and metadata
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload", post(handlers::file::upload_file))
        .route(
            "/files/{id}",
            get(handlers::file::get_file)
                .put(handlers::file::rename_file)
                .delete(handlers::file::delete_file),
        )
        .route("/files/{id}/download", get(handlers::file::download_file))
        .route("/files/{id}/move", put(handlers::file::move_file))
}

/// Version engine
fn version_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files/{id}/versioning/enable",
            post(handlers::version::enable_versioning),
        )
        .route(
            "/files/{id}/versioning/disable",
            post(handlers::version::disable_versioning),
        )
        .route(
            "/files/{id}/versions",
            get(handlers::version::list_versions).post(handlers::version::create_version),
        )
        .route(
            "/files/{id}/versions/{version}/restore",
            post(handlers::version::restore_version),
        )
        .route(
            "/files/{id}/versions/{version}/download",
            get(handlers::version::download_version),
        )
}

/// Bulk operations
fn bulk_routes() -> Router<AppState> {
    Router::new().route("/bulk", post(handlers::bulk::bulk_operation))
}

/// Search endpoints
fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::search::search))
        .route("/search/file-types", get(handlers::search::file_types))
}

/// Favorites
fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/favorites",
            get(handlers::favorite::list_favorites).post(handlers::favorite::add_favorite),
        )
        .route(
            "/favorites/item",
            delete(handlers::favorite::remove_favorite_by_item),
        )
        .route(
            "/favorites/{id}",
            delete(handlers::favorite::remove_favorite),
        )
        .route(
            "/favorites/check/{type}/{id}",
            get(handlers::favorite::check_favorite),
        )
}

/// Recent access
fn recent_routes() -> Router<AppState> {
    Router::new()
        .route("/recent", get(handlers::recent::recent_items))
        .route("/recent/{type}/{id}", post(handlers::recent::track_access))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::ready))
}
