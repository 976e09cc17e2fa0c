//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Filesystem blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for uploaded blobs.
    #[serde(default = "default_blob_root")]
    pub blob_root: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            blob_root: default_blob_root(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_blob_root() -> String {
    "data/uploads".to_string()
}

fn default_max_upload() -> u64 {
    // 256 MiB
    256 * 1024 * 1024
}
