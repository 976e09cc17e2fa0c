//! Item entity model — the polymorphic file/folder tree node.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Discriminates files from folders within the `items` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ItemKind {
    /// A regular file backed by a stored blob.
    File,
    /// A folder; may contain other items.
    Folder,
}

impl ItemKind {
    /// Database/wire string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// A node of a user's file tree: either a file or a folder.
///
/// `parent_id`, when set, references a folder owned by the same user;
/// `None` means the item sits at the owner's root.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: i64,
    /// The owning user.
    pub owner_id: i64,
    /// Containing folder (None for root-level items).
    pub parent_id: Option<i64>,
    /// Display name. For files this is the original upload name.
    pub name: String,
    /// File or folder.
    pub kind: ItemKind,
    /// Name of the blob on disk (files only).
    #[serde(skip_serializing)]
    pub stored_name: Option<String>,
    /// Size in bytes (0 for folders).
    pub size: i64,
    /// MIME type (files only).
    pub mime: Option<String>,
    /// Privacy flag. A private item (or private ancestor) blocks share
    /// access for everyone but the owner.
    pub is_private: bool,
    /// Stable share code, minted lazily on first share.
    pub share_code: Option<String>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Whether this item is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }
}

/// Data required to insert a new item row.
#[derive(Debug, Clone)]
pub struct CreateItem {
    /// The owning user.
    pub owner_id: i64,
    /// Containing folder (None for root).
    pub parent_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// File or folder.
    pub kind: ItemKind,
    /// Blob name on disk (files only).
    pub stored_name: Option<String>,
    /// Size in bytes.
    pub size: i64,
    /// MIME type (files only).
    pub mime: Option<String>,
}
