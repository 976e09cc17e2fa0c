//! Response DTOs.
//!
//! Entities serialize with their storage field names; these DTOs are the
//! camelCase wire shapes the web client consumes.

use serde::{Deserialize, Serialize};

use glasscloud_entity::item::Item;
use glasscloud_entity::user::User;

/// Wire shape of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Account creation time (RFC 3339).
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Wire shape of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    /// Item ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// "file" or "folder".
    #[serde(rename = "type")]
    pub kind: String,
    /// Containing folder, null at root.
    pub parent_id: Option<i64>,
    /// Size in bytes (0 for folders).
    pub size: i64,
    /// MIME type, null for folders.
    pub mime: Option<String>,
    /// Privacy flag.
    pub is_private: bool,
    /// Share code, null until first shared.
    pub share_code: Option<String>,
    /// Creation time (RFC 3339).
    pub created_at: String,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            kind: item.kind.as_str().to_string(),
            parent_id: item.parent_id,
            size: item.size,
            mime: item.mime,
            is_private: item.is_private,
            share_code: item.share_code,
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

/// Share endpoint payload: the item plus navigable share link parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    /// Share code.
    pub share_code: String,
    /// Path component of the share link.
    pub share_path: String,
    /// Absolute share link, when a base URL is known.
    pub share_url: String,
    /// The shared item.
    pub item: ItemResponse,
}

impl ShareResponse {
    /// Assemble the share payload from an item carrying a code and the
    /// base URL the link should be anchored at.
    pub fn new(item: Item, base_url: &str) -> Self {
        let code = item.share_code.clone().unwrap_or_default();
        let share_path = format!("/share/{code}");
        let share_url = format!("{}{share_path}", base_url.trim_end_matches('/'));
        Self {
            share_code: code,
            share_path,
            share_url,
            item: item.into(),
        }
    }
}
