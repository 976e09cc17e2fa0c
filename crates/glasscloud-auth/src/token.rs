//! Opaque bearer token lifecycle.
//!
//! Tokens are random hex strings stored server-side with an expiry. An
//! unknown or expired token is equivalent to "unauthenticated"; expired
//! rows are deleted the first time they are seen.

use std::fmt::Write as _;
use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{Duration, Utc};
use tracing::debug;

use glasscloud_core::config::auth::AuthConfig;
use glasscloud_core::error::AppError;
use glasscloud_database::repositories::token::TokenRepository;
use glasscloud_database::repositories::user::UserRepository;
use glasscloud_entity::token::AuthToken;
use glasscloud_entity::user::User;

/// Generate `n_bytes` of OS randomness as a lowercase hex string.
///
/// Used for bearer tokens and share codes.
pub fn random_hex(n_bytes: usize) -> String {
    let mut buf = vec![0u8; n_bytes];
    OsRng.fill_bytes(&mut buf);

    let mut out = String::with_capacity(n_bytes * 2);
    for byte in &buf {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Mints, resolves, and revokes opaque bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenManager {
    token_repo: Arc<TokenRepository>,
    user_repo: Arc<UserRepository>,
    config: AuthConfig,
}

impl TokenManager {
    /// Creates a new token manager.
    pub fn new(
        token_repo: Arc<TokenRepository>,
        user_repo: Arc<UserRepository>,
        config: AuthConfig,
    ) -> Self {
        Self {
            token_repo,
            user_repo,
            config,
        }
    }

    /// Mint a fresh token for a user.
    pub async fn issue(&self, user_id: i64) -> Result<AuthToken, AppError> {
        let token = random_hex(self.config.token_bytes);
        let expires_at = Utc::now() + Duration::days(self.config.token_ttl_days);
        self.token_repo.create(&token, user_id, expires_at).await
    }

    /// Resolve a bearer token to its user.
    ///
    /// Expired tokens are deleted on sight and reported as unauthorized,
    /// indistinguishable from unknown tokens.
    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let row = self
            .token_repo
            .find(token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        if row.is_expired() {
            let _ = self.token_repo.delete(token).await;
            return Err(AppError::unauthorized("Invalid or expired token"));
        }

        self.user_repo
            .find_by_id(row.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))
    }

    /// Revoke a token. Idempotent.
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        self.token_repo.delete(token).await?;
        Ok(())
    }

    /// Prune tokens whose expiry has passed.
    pub async fn prune_expired(&self) -> Result<u64, AppError> {
        let pruned = self.token_repo.delete_expired(Utc::now()).await?;
        if pruned > 0 {
            debug!(pruned, "Pruned expired tokens");
        }
        Ok(pruned)
    }
}
