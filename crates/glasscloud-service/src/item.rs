//! Item tree operations: listing, folder creation, uploads, rename,
//! privacy, and recursive delete.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use glasscloud_core::error::AppError;
use glasscloud_core::result::AppResult;
use glasscloud_database::repositories::item::ItemRepository;
use glasscloud_entity::item::{CreateItem, Item, ItemKind};
use glasscloud_storage::{BlobStore, mime_for_name};

use crate::context::RequestContext;
use crate::tree;

/// An upload about to be persisted.
#[derive(Debug)]
pub struct NewUpload {
    /// Client-supplied file name.
    pub file_name: String,
    /// Client-supplied MIME type, if any.
    pub mime: Option<String>,
    /// Destination folder (None for root).
    pub parent_id: Option<i64>,
    /// File content.
    pub data: Bytes,
}

/// Manages the per-user file/folder tree and its backing blobs.
#[derive(Debug, Clone)]
pub struct ItemService {
    item_repo: Arc<ItemRepository>,
    blob_store: Arc<dyn BlobStore>,
    max_upload_size_bytes: u64,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(
        item_repo: Arc<ItemRepository>,
        blob_store: Arc<dyn BlobStore>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            item_repo,
            blob_store,
            max_upload_size_bytes,
        }
    }

    /// Look up an item the caller must own.
    ///
    /// Unknown ids are `NotFound`; items owned by someone else are
    /// `Forbidden`.
    pub async fn find_owned(&self, ctx: &RequestContext, id: i64) -> AppResult<Item> {
        let item = self
            .item_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        if item.owner_id != ctx.user_id {
            return Err(AppError::forbidden("You do not own this item"));
        }
        Ok(item)
    }

    /// Validate a destination folder for listing or insertion.
    ///
    /// The folder must exist, be a folder, and belong to the caller; any
    /// failure is reported as `NotFound` so foreign folder ids are not
    /// distinguishable from absent ones.
    async fn resolve_parent(
        &self,
        ctx: &RequestContext,
        parent_id: Option<i64>,
    ) -> AppResult<Option<Item>> {
        let Some(parent_id) = parent_id else {
            return Ok(None);
        };

        let parent = self
            .item_repo
            .find_by_id(parent_id)
            .await?
            .filter(|p| p.owner_id == ctx.user_id && p.is_folder())
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        Ok(Some(parent))
    }

    /// List a folder's children (or the caller's root). Returns the
    /// containing folder alongside so clients can render breadcrumbs.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        parent_id: Option<i64>,
    ) -> AppResult<(Option<Item>, Vec<Item>)> {
        let current = self.resolve_parent(ctx, parent_id).await?;
        let children = self.item_repo.list_children(ctx.user_id, parent_id).await?;
        Ok((current, children))
    }

    /// Create a folder. New folders are born private; a blank name falls
    /// back to a default.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<i64>,
    ) -> AppResult<Item> {
        let name = if name.trim().is_empty() {
            "New Folder".to_string()
        } else {
            sanitize_name(name)?
        };
        self.resolve_parent(ctx, parent_id).await?;

        let folder = self
            .item_repo
            .create(&CreateItem {
                owner_id: ctx.user_id,
                parent_id,
                name,
                kind: ItemKind::Folder,
                stored_name: None,
                size: 0,
                mime: None,
            })
            .await?;

        info!(user_id = ctx.user_id, item_id = folder.id, "Folder created");
        Ok(folder)
    }

    /// Persist an uploaded file: blob first, then the row. New files are
    /// born private.
    pub async fn upload(&self, ctx: &RequestContext, upload: NewUpload) -> AppResult<Item> {
        let name = sanitize_name(&upload.file_name)?;
        self.resolve_parent(ctx, upload.parent_id).await?;

        if upload.data.len() as u64 > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the upload limit of {} bytes",
                self.max_upload_size_bytes
            )));
        }

        let mime = upload
            .mime
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| mime_for_name(&name));

        let stored_name = generate_stored_name(&name);
        let size = self.blob_store.write(&stored_name, upload.data).await?;

        let created = self
            .item_repo
            .create(&CreateItem {
                owner_id: ctx.user_id,
                parent_id: upload.parent_id,
                name,
                kind: ItemKind::File,
                stored_name: Some(stored_name.clone()),
                size: size as i64,
                mime: Some(mime),
            })
            .await;

        match created {
            Ok(item) => {
                info!(
                    user_id = ctx.user_id,
                    item_id = item.id,
                    bytes = size,
                    "File uploaded"
                );
                Ok(item)
            }
            Err(e) => {
                // Don't leave an orphaned blob behind a failed insert.
                if let Err(cleanup) = self.blob_store.delete(&stored_name).await {
                    warn!(stored_name, error = %cleanup, "Failed to clean up blob");
                }
                Err(e)
            }
        }
    }

    /// Rename an item the caller owns.
    pub async fn rename(&self, ctx: &RequestContext, id: i64, name: &str) -> AppResult<Item> {
        let item = self.find_owned(ctx, id).await?;
        let name = sanitize_name(name)?;
        self.item_repo.rename(item.id, &name).await
    }

    /// Set the privacy flag on a file or folder the caller owns.
    pub async fn set_privacy(
        &self,
        ctx: &RequestContext,
        id: i64,
        is_private: bool,
    ) -> AppResult<Item> {
        let item = self.find_owned(ctx, id).await?;
        self.item_repo.set_privacy(item.id, is_private).await
    }

    /// Delete an item and, for folders, its whole subtree.
    ///
    /// Rows go first in a single statement, then the blobs. A blob that
    /// fails to delete is logged and skipped; the rows are already gone.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> AppResult<u64> {
        let item = self.find_owned(ctx, id).await?;

        let mut doomed = tree::collect_descendants(&self.item_repo, &item).await?;
        doomed.push(item);

        let ids: Vec<i64> = doomed.iter().map(|i| i.id).collect();
        let deleted = self.item_repo.delete_many(&ids).await?;

        for item in &doomed {
            if let Some(stored_name) = item.stored_name.as_deref() {
                if let Err(e) = self.blob_store.delete(stored_name).await {
                    warn!(item_id = item.id, stored_name, error = %e, "Failed to delete blob");
                }
            }
        }

        info!(user_id = ctx.user_id, deleted, "Deleted item subtree");
        Ok(deleted)
    }
}

/// Reduce a client-supplied name to its final path component and trim it.
fn sanitize_name(name: &str) -> AppResult<String> {
    let base = name.replace('\\', "/");
    let base = base.rsplit('/').next().unwrap_or("").trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(AppError::validation("Invalid item name"));
    }
    Ok(base.to_string())
}

/// Generate a unique on-disk name, keeping the original extension so the
/// blob directory stays inspectable.
fn generate_stored_name(name: &str) -> String {
    let stem = Uuid::new_v4().simple().to_string();
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("{stem}.{}", ext.to_ascii_lowercase())
        }
        _ => stem,
    }
}
