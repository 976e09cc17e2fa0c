//! Download assembly: single files stream from the blob store, folders
//! are zipped in memory from a work-list walk of the subtree.

use std::sync::Arc;

use glasscloud_core::error::AppError;
use glasscloud_core::result::AppResult;
use glasscloud_database::repositories::item::ItemRepository;
use glasscloud_entity::item::Item;
use glasscloud_storage::{ArchiveBuilder, BlobStore, ByteStream};

/// The body of a prepared download.
pub enum DownloadBody {
    /// A single file, streamed from disk.
    Stream {
        /// The blob's byte stream.
        stream: ByteStream,
        /// Content length.
        size: i64,
    },
    /// A folder rendered as an in-memory zip archive.
    Archive(Vec<u8>),
}

/// A download ready to be turned into an HTTP response.
pub struct Download {
    /// Suggested file name for Content-Disposition.
    pub file_name: String,
    /// MIME type of the body.
    pub content_type: String,
    /// The payload.
    pub body: DownloadBody,
}

/// Prepares file and folder downloads.
///
/// Authorization is the caller's job; this service assumes the item has
/// already passed ownership or share checks.
#[derive(Debug, Clone)]
pub struct DownloadService {
    item_repo: Arc<ItemRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(item_repo: Arc<ItemRepository>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            item_repo,
            blob_store,
        }
    }

    /// Prepare a download for an item.
    ///
    /// Files stream straight from the blob store. Folders are walked with
    /// a work-list and packed into a zip; when `include_private` is false
    /// (share access by a non-owner), private subtrees are skipped.
    pub async fn prepare(&self, item: &Item, include_private: bool) -> AppResult<Download> {
        if item.is_folder() {
            self.prepare_folder(item, include_private).await
        } else {
            self.prepare_file(item).await
        }
    }

    async fn prepare_file(&self, item: &Item) -> AppResult<Download> {
        let stored_name = item
            .stored_name
            .as_deref()
            .ok_or_else(|| AppError::internal("File item has no stored blob"))?;

        let stream = self.blob_store.stream(stored_name).await?;
        Ok(Download {
            file_name: item.name.clone(),
            content_type: item
                .mime
                .clone()
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            body: DownloadBody::Stream {
                stream,
                size: item.size,
            },
        })
    }

    async fn prepare_folder(&self, folder: &Item, include_private: bool) -> AppResult<Download> {
        let mut archive = ArchiveBuilder::new();
        let mut worklist = vec![(String::new(), folder.id)];

        while let Some((prefix, folder_id)) = worklist.pop() {
            for child in self.item_repo.list_children_of(folder_id).await? {
                if !include_private && child.is_private {
                    continue;
                }
                let entry = format!("{prefix}{}", child.name);
                if child.is_folder() {
                    archive.add_dir(&entry)?;
                    worklist.push((format!("{entry}/"), child.id));
                } else {
                    let stored_name = child
                        .stored_name
                        .as_deref()
                        .ok_or_else(|| AppError::internal("File item has no stored blob"))?;
                    let data = self.blob_store.read(stored_name).await?;
                    archive.add_file(&entry, &data)?;
                }
            }
        }

        Ok(Download {
            file_name: format!("{}.zip", folder.name),
            content_type: "application/zip".to_string(),
            body: DownloadBody::Archive(archive.finish()?),
        })
    }
}
