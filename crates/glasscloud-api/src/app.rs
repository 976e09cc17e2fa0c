//! Application builder — wires repositories, services, and state into an
//! Axum app and runs the server.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

use glasscloud_auth::password::PasswordHasher;
use glasscloud_auth::token::TokenManager;
use glasscloud_core::config::AppConfig;
use glasscloud_core::error::AppError;
use glasscloud_database::repositories::item::ItemRepository;
use glasscloud_database::repositories::token::TokenRepository;
use glasscloud_database::repositories::user::UserRepository;
use glasscloud_service::{AccountService, DownloadService, ItemService, ShareService};
use glasscloud_storage::{BlobStore, LocalBlobStore};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Construct the full application state from configuration and a pool.
///
/// Shared between the server binary and the integration tests, so both
/// run the exact same wiring.
pub async fn build_state(config: AppConfig, db_pool: SqlitePool) -> Result<AppState, AppError> {
    let blob_store: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(&config.storage.blob_root).await?);

    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let token_repo = Arc::new(TokenRepository::new(db_pool.clone()));
    let item_repo = Arc::new(ItemRepository::new(db_pool.clone()));

    let password_hasher = Arc::new(PasswordHasher::new());
    let token_manager = Arc::new(TokenManager::new(
        Arc::clone(&token_repo),
        Arc::clone(&user_repo),
        config.auth.clone(),
    ));

    let account_service = Arc::new(AccountService::new(
        Arc::clone(&user_repo),
        Arc::clone(&token_manager),
        Arc::clone(&password_hasher),
        config.auth.clone(),
    ));
    let item_service = Arc::new(ItemService::new(
        Arc::clone(&item_repo),
        Arc::clone(&blob_store),
        config.storage.max_upload_size_bytes,
    ));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&item_repo),
        Arc::clone(&user_repo),
        config.auth.clone(),
    ));
    let download_service = Arc::new(DownloadService::new(
        Arc::clone(&item_repo),
        Arc::clone(&blob_store),
    ));

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        blob_store,
        password_hasher,
        token_manager,
        user_repo,
        token_repo,
        item_repo,
        account_service,
        item_service,
        share_service,
        download_service,
    })
}

/// Runs the GlassCloud server with the given configuration and database
/// pool.
pub async fn run_server(config: AppConfig, db_pool: SqlitePool) -> Result<(), AppError> {
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = build_state(config, db_pool).await?;

    // Sweep tokens that expired while the server was down.
    state.token_manager.prune_expired().await?;

    let app = build_app(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("GlassCloud server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
    }
}
