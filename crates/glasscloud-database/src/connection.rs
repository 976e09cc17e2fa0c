//! SQLite connection pool management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use glasscloud_core::config::database::DatabaseConfig;
use glasscloud_core::error::{AppError, ErrorKind};

/// Create a connection pool for the configured SQLite database.
///
/// The database file (and its parent directory) is created if missing.
/// Foreign keys are enforced on every connection.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, AppError> {
    info!(
        path = %config.path,
        max_connections = config.max_connections,
        "Opening SQLite database"
    );

    if let Some(parent) = std::path::Path::new(&config.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to create database directory: {}", parent.display()),
                    e,
                )
            })?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.path))
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Invalid database path", e)
        })?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(options)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to open database: {e}"),
                e,
            )
        })?;

    info!("Database opened");
    Ok(pool)
}
