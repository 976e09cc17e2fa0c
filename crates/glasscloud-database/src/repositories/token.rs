//! Bearer token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use glasscloud_core::error::{AppError, ErrorKind};
use glasscloud_core::result::AppResult;
use glasscloud_entity::token::AuthToken;

/// Repository for opaque bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    pool: SqlitePool,
}

impl TokenRepository {
    /// Create a new token repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a freshly minted token.
    pub async fn create(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> AppResult<AuthToken> {
        sqlx::query_as::<_, AuthToken>(
            "INSERT INTO tokens (token, user_id, expires_at, created_at) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store token", e))
    }

    /// Look up a token row. Expiry is checked by the caller.
    pub async fn find(&self, token: &str) -> AppResult<Option<AuthToken>> {
        sqlx::query_as::<_, AuthToken>("SELECT * FROM tokens WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find token", e))
    }

    /// Delete a token. Idempotent; returns whether a row was removed.
    pub async fn delete(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete token", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every token that expired before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to prune expired tokens", e)
            })?;
        Ok(result.rows_affected())
    }
}
