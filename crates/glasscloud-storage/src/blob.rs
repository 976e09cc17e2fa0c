//! Blob store trait and its local-filesystem implementation.
//!
//! Blobs live in a single flat directory under generated names; the item
//! tree structure exists only in the database.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use glasscloud_core::error::{AppError, ErrorKind};
use glasscloud_core::result::AppResult;

/// A boxed stream of file bytes for response bodies.
pub type ByteStream = futures::stream::BoxStream<'static, std::io::Result<Bytes>>;

/// Storage backend for uploaded file content.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Persist a blob under the given stored name. Returns the byte count.
    async fn write(&self, stored_name: &str, data: Bytes) -> AppResult<u64>;

    /// Read a whole blob into memory.
    async fn read(&self, stored_name: &str) -> AppResult<Bytes>;

    /// Open a blob as a byte stream for incremental reads.
    async fn stream(&self, stored_name: &str) -> AppResult<ByteStream>;

    /// Remove a blob. Missing blobs are not an error.
    async fn delete(&self, stored_name: &str) -> AppResult<()>;

    /// Whether a blob exists.
    async fn exists(&self, stored_name: &str) -> AppResult<bool>;
}

/// Local filesystem blob store.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Directory holding all blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a blob store rooted at the given directory, creating it if
    /// missing.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a stored name to its on-disk path.
    ///
    /// Stored names are generated by us, but path separators are rejected
    /// anyway so a corrupted row cannot escape the root.
    fn resolve(&self, stored_name: &str) -> AppResult<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains('/')
            || stored_name.contains('\\')
            || stored_name.contains("..")
        {
            return Err(AppError::storage(format!(
                "Invalid stored name: {stored_name}"
            )));
        }
        Ok(self.root.join(stored_name))
    }

    fn not_found_or_io(e: std::io::Error, what: &str) -> AppError {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("Blob not found: {what}"))
        } else {
            AppError::with_source(ErrorKind::Storage, format!("Failed to read blob: {what}"), e)
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn write(&self, stored_name: &str, data: Bytes) -> AppResult<u64> {
        let path = self.resolve(stored_name)?;
        let len = data.len() as u64;

        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {stored_name}"),
                e,
            )
        })?;

        debug!(stored_name, bytes = len, "Wrote blob");
        Ok(len)
    }

    async fn read(&self, stored_name: &str) -> AppResult<Bytes> {
        let path = self.resolve(stored_name)?;
        let data = fs::read(&path)
            .await
            .map_err(|e| Self::not_found_or_io(e, stored_name))?;
        Ok(Bytes::from(data))
    }

    async fn stream(&self, stored_name: &str) -> AppResult<ByteStream> {
        let path = self.resolve(stored_name)?;
        let file = fs::File::open(&path)
            .await
            .map_err(|e| Self::not_found_or_io(e, stored_name))?;

        Ok(ReaderStream::new(file).boxed())
    }

    async fn delete(&self, stored_name: &str) -> AppResult<()> {
        let path = self.resolve(stored_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {stored_name}"),
                e,
            )),
        }
    }

    async fn exists(&self, stored_name: &str) -> AppResult<bool> {
        let path = self.resolve(stored_name)?;
        Ok(path.exists())
    }
}

/// Guess a MIME type from a file name, for uploads that omit one.
pub fn mime_for_name(name: &str) -> String {
    mime_guess::from_path(Path::new(name))
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}
