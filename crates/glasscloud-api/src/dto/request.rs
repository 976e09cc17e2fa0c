//! Request DTOs with validation.
//!
//! Body fields and query parameters use camelCase on the wire.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Email address.
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name. Blank falls back to a server-side default.
    #[validate(length(max = 255))]
    #[serde(default)]
    pub name: String,
    /// Destination folder (omitted for root).
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Rename request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Privacy toggle request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyRequest {
    /// New privacy flag.
    pub is_private: bool,
}

/// Query parameters for listing a folder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsQuery {
    /// Folder to list (omitted for root).
    pub parent_id: Option<i64>,
}

/// Query parameters for navigating inside a shared subtree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTargetQuery {
    /// Descendant item to target (omitted for the shared item itself).
    pub item_id: Option<i64>,
}
