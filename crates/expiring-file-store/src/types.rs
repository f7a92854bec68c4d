//! Store types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// In-memory metadata for one stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Client-supplied filename, untrusted, used only for the download name
    pub original_name: String,
    /// Normalized extension (lowercase, leading dot)
    pub extension: String,
    /// Normalized MIME type, if one was supplied or inferred
    pub content_type: Option<String>,
    /// Exact byte count written to disk
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Configuration for the store, fixed at construction
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one blob file per id
    pub storage_dir: PathBuf,
    /// Seconds until an uploaded file expires
    pub ttl_secs: u64,
    /// Maximum size of a single upload in bytes
    pub max_file_size: u64,
    /// Seconds between reclamation cycles
    pub reclaim_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("./uploads"),
            ttl_secs: 3600,                     // 60 minutes
            max_file_size: 500 * 1024 * 1024,   // 500 MiB
            reclaim_interval_secs: 60,
        }
    }
}

/// Returned to the uploader on success
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub id: String,
    /// Id plus the validated extension, usable as a download path segment
    pub download_path: String,
    pub expires_at: DateTime<Utc>,
    pub original_filename: String,
    pub size_bytes: u64,
}

/// Statistics about the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub entries: usize,
    pub total_size_bytes: u64,
    pub uploads: u64,
    pub downloads: u64,
    pub reclaimed: u64,
}
