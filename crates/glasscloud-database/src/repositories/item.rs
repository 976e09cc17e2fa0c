//! Item repository implementation.
//!
//! Queries over the polymorphic `items` table. Listing order matches the
//! original UI expectation: folders first, then case-insensitive by name.

use chrono::Utc;
use sqlx::SqlitePool;

use glasscloud_core::error::{AppError, ErrorKind};
use glasscloud_core::result::AppResult;
use glasscloud_entity::item::{CreateItem, Item};

const LIST_ORDER: &str = "ORDER BY CASE WHEN kind = 'folder' THEN 0 ELSE 1 END, name COLLATE NOCASE";

/// Repository for file/folder item rows.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Create a new item repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find an item by ID, regardless of owner.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))
    }

    /// Find an item by its share code.
    pub async fn find_by_share_code(&self, code: &str) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE share_code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find item by share code", e)
            })
    }

    /// Whether any item already uses the given share code.
    pub async fn share_code_exists(&self, code: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE share_code = ?")
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check share code", e)
            })?;
        Ok(count > 0)
    }

    /// List the immediate children of a folder (or of the owner's root).
    pub async fn list_children(
        &self,
        owner_id: i64,
        parent_id: Option<i64>,
    ) -> AppResult<Vec<Item>> {
        let sql_with_parent =
            format!("SELECT * FROM items WHERE owner_id = ? AND parent_id = ? {LIST_ORDER}");
        let sql_root =
            format!("SELECT * FROM items WHERE owner_id = ? AND parent_id IS NULL {LIST_ORDER}");
        let query = match parent_id {
            Some(parent_id) => sqlx::query_as::<_, Item>(&sql_with_parent)
                .bind(owner_id)
                .bind(parent_id),
            None => sqlx::query_as::<_, Item>(&sql_root).bind(owner_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list items", e))
    }

    /// List the immediate children of a folder without an owner scope.
    ///
    /// Used by share resolution, where the viewer is not the owner.
    pub async fn list_children_of(&self, parent_id: i64) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(&format!(
            "SELECT * FROM items WHERE parent_id = ? {LIST_ORDER}"
        ))
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Insert a new item row. New items are born private.
    pub async fn create(&self, data: &CreateItem) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items \
             (owner_id, parent_id, name, kind, stored_name, size, mime, is_private, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?) RETURNING *",
        )
        .bind(data.owner_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(data.kind)
        .bind(data.stored_name.as_deref())
        .bind(data.size)
        .bind(data.mime.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create item", e))
    }

    /// Rename an item.
    pub async fn rename(&self, id: i64, name: &str) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("UPDATE items SET name = ? WHERE id = ? RETURNING *")
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename item", e))
    }

    /// Flip the privacy flag.
    pub async fn set_privacy(&self, id: i64, is_private: bool) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("UPDATE items SET is_private = ? WHERE id = ? RETURNING *")
            .bind(is_private)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set privacy", e))
    }

    /// Attach a share code to an item. The unique index rejects reuse.
    pub async fn set_share_code(&self, id: i64, code: &str) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("UPDATE items SET share_code = ? WHERE id = ? RETURNING *")
            .bind(code)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if super::user::is_unique_violation(&e) {
                    AppError::conflict("Share code already in use")
                } else {
                    AppError::with_source(ErrorKind::Database, "Failed to set share code", e)
                }
            })
    }

    /// Delete a set of items by ID. Returns the number of deleted rows.
    pub async fn delete_many(&self, ids: &[i64]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = sqlx::QueryBuilder::new("DELETE FROM items WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete items", e))?;

        Ok(result.rows_affected())
    }
}
