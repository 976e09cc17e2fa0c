//! Account registration, login, and logout.

use std::sync::Arc;

use tracing::info;

use glasscloud_auth::password::PasswordHasher;
use glasscloud_auth::token::TokenManager;
use glasscloud_core::config::auth::AuthConfig;
use glasscloud_core::error::AppError;
use glasscloud_core::result::AppResult;
use glasscloud_database::repositories::user::UserRepository;
use glasscloud_entity::token::AuthToken;
use glasscloud_entity::user::{CreateUser, User};

/// Handles user accounts and their sessions.
#[derive(Debug, Clone)]
pub struct AccountService {
    user_repo: Arc<UserRepository>,
    token_manager: Arc<TokenManager>,
    hasher: Arc<PasswordHasher>,
    config: AuthConfig,
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        token_manager: Arc<TokenManager>,
        hasher: Arc<PasswordHasher>,
        config: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            token_manager,
            hasher,
            config,
        }
    }

    /// Register a new user and log them in.
    ///
    /// A taken username surfaces as `Conflict` from the unique index rather
    /// than a pre-check, so concurrent registrations cannot race past it.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> AppResult<(User, AuthToken)> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }
        if password.len() < self.config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.config.password_min_length
            )));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                username: username.to_string(),
                password_hash,
                email: email.to_string(),
            })
            .await?;

        let token = self.token_manager.issue(user.id).await?;
        info!(user_id = user.id, username = %user.username, "User registered");

        Ok((user, token))
    }

    /// Verify credentials and mint a fresh token.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, AuthToken)> {
        let user = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        let token = self.token_manager.issue(user.id).await?;
        info!(user_id = user.id, username = %user.username, "User logged in");

        Ok((user, token))
    }

    /// Revoke a bearer token. Succeeds even if the token is already gone.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.token_manager.revoke(token).await
    }
}
