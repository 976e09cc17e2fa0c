//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::SqlitePool;

use glasscloud_auth::password::PasswordHasher;
use glasscloud_auth::token::TokenManager;
use glasscloud_core::config::AppConfig;
use glasscloud_database::repositories::item::ItemRepository;
use glasscloud_database::repositories::token::TokenRepository;
use glasscloud_database::repositories::user::UserRepository;
use glasscloud_service::{AccountService, DownloadService, ItemService, ShareService};
use glasscloud_storage::BlobStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// SQLite connection pool
    pub db_pool: SqlitePool,
    /// Blob store for uploaded file content
    pub blob_store: Arc<dyn BlobStore>,

    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Bearer token manager
    pub token_manager: Arc<TokenManager>,

    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Token repository
    pub token_repo: Arc<TokenRepository>,
    /// Item repository
    pub item_repo: Arc<ItemRepository>,

    /// Account/session service
    pub account_service: Arc<AccountService>,
    /// Item tree service
    pub item_service: Arc<ItemService>,
    /// Share service
    pub share_service: Arc<ShareService>,
    /// Download service
    pub download_service: Arc<DownloadService>,
}
