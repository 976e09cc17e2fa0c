//! Opaque bearer token entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An issued opaque bearer token.
///
/// The token string itself is the primary key; there is no separate
/// session identifier. An expired token is treated as unauthenticated and
/// deleted on first sight.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthToken {
    /// The random hex token string.
    pub token: String,
    /// The user this token authenticates.
    pub user_id: i64,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    /// Whether the token has passed its expiry.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
