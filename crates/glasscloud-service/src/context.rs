//! Request context carrying the authenticated user.

use serde::{Deserialize, Serialize};

/// Context for the current authenticated request.
///
/// Extracted from the bearer token by the API layer and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: i64,
    /// The username (convenience field for responses and logs).
    pub username: String,
    /// The user's email address.
    pub email: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: i64, username: String, email: String) -> Self {
        Self {
            user_id,
            username,
            email,
        }
    }
}
