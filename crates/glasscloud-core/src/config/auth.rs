//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token lifetime in days.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_days: i64,
    /// Number of random bytes in a bearer token (hex-encoded on the wire).
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// Number of random bytes in a share code (hex-encoded on the wire).
    #[serde(default = "default_share_code_bytes")]
    pub share_code_bytes: usize,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_days: default_token_ttl(),
            token_bytes: default_token_bytes(),
            share_code_bytes: default_share_code_bytes(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_token_ttl() -> i64 {
    30
}

fn default_token_bytes() -> usize {
    24
}

fn default_share_code_bytes() -> usize {
    8
}

fn default_password_min() -> usize {
    8
}
