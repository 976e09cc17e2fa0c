//! Route definitions for the GlassCloud HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(item_routes())
        .merge(share_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        // Leave headroom for multipart framing around the upload limit.
        .layer(DefaultBodyLimit::max(max_upload + 64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Item tree: listing, folders, upload, rename, privacy, delete, download
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(handlers::item::list_items))
        .route("/folders", post(handlers::item::create_folder))
        .route("/files/upload", post(handlers::item::upload_file))
        .route("/items/{id}", patch(handlers::item::rename_item))
        .route("/items/{id}", delete(handlers::item::delete_item))
        .route("/items/{id}/privacy", patch(handlers::item::set_privacy))
        .route("/items/{id}/download", get(handlers::item::download_item))
}

/// Share minting and public share access
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/items/{id}/share", post(handlers::share::create_share))
        .route("/public/{code}", get(handlers::share::access_share))
        .route(
            "/public/{code}/children",
            get(handlers::share::share_children),
        )
        .route(
            "/public/{code}/download",
            get(handlers::share::share_download),
        )
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
