//! In-memory zip assembly for folder downloads.
//!
//! A folder download walks the item subtree with a work-list and feeds
//! each file into an [`ArchiveBuilder`]; the result is served as a single
//! `application/zip` body.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use glasscloud_core::error::AppError;
use glasscloud_core::result::AppResult;

/// Builds a zip archive in memory, one entry at a time.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveBuilder {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            entries: 0,
        }
    }

    /// Append a file entry. `entry_path` is the path inside the archive,
    /// e.g. `photos/2024/cat.jpg`.
    pub fn add_file(&mut self, entry_path: &str, data: &[u8]) -> AppResult<()> {
        self.writer
            .start_file(entry_path, self.options)
            .map_err(|e| AppError::storage(format!("Zip entry failed: {e}")))?;
        self.writer
            .write_all(data)
            .map_err(|e| AppError::storage(format!("Zip write failed: {e}")))?;
        self.entries += 1;
        Ok(())
    }

    /// Append an explicit directory entry so empty folders survive the
    /// round trip.
    pub fn add_dir(&mut self, entry_path: &str) -> AppResult<()> {
        self.writer
            .add_directory(entry_path, self.options)
            .map_err(|e| AppError::storage(format!("Zip directory failed: {e}")))?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Whether the archive is still empty.
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Finalize the archive and return its bytes.
    pub fn finish(self) -> AppResult<Vec<u8>> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| AppError::storage(format!("Zip finalize failed: {e}")))?;
        Ok(cursor.into_inner())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
