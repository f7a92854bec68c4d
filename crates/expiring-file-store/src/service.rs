//! Content service orchestrating validation, blob storage, and metadata
//!
//! The only component the outside world calls. `put` ingests a byte stream
//! and returns a receipt; `get` resolves a download; `reclaim_expired` is
//! the sweep primitive driven by the reclaimer.

use crate::blob::BlobStore;
use crate::error::{Result, StoreError};
use crate::meta::MetadataTable;
use crate::types::{FileRecord, StoreConfig, StoreStats, UploadReceipt};
use crate::validate::{normalize_extension, validate};
use bytes::Bytes;
use chrono::{Duration, Utc};
use futures_util::Stream;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A resolved download: the open blob plus everything needed to serve it
pub struct Download {
    pub file: fs::File,
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: u64,
}

/// Orchestration layer over the validator, blob store, and metadata table
pub struct ContentService {
    config: StoreConfig,
    blobs: BlobStore,
    meta: MetadataTable,
    uploads: AtomicU64,
    downloads: AtomicU64,
    reclaimed: AtomicU64,
}

impl ContentService {
    pub fn new(config: StoreConfig) -> Self {
        let blobs = BlobStore::new(config.storage_dir.clone());
        Self {
            config,
            blobs,
            meta: MetadataTable::new(),
            uploads: AtomicU64::new(0),
            downloads: AtomicU64::new(0),
            reclaimed: AtomicU64::new(0),
        }
    }

    /// Ensure the storage directory exists
    pub async fn init(&self) -> Result<()> {
        self.blobs.init().await
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Ingest an upload. The extension override takes precedence over the
    /// filename suffix, the MIME override over the stream's intrinsic
    /// content type. Validation runs before any byte is written; a failed
    /// write leaves neither a record nor a blob behind.
    pub async fn put<S>(
        &self,
        filename: &str,
        extension_override: Option<&str>,
        mime_override: Option<&str>,
        stream_content_type: Option<&str>,
        stream: S,
    ) -> Result<UploadReceipt>
    where
        S: Stream<Item = std::io::Result<Bytes>>,
    {
        let extension = match extension_override {
            Some(ext) => normalize_extension(ext),
            None => Path::new(filename)
                .extension()
                .map(|ext| normalize_extension(&ext.to_string_lossy()))
                .unwrap_or_default(),
        };
        let content_type = mime_override.or(stream_content_type).map(str::to_string);

        validate(&extension, content_type.as_deref())?;

        let id = Uuid::new_v4().to_string();
        let size_bytes = self
            .blobs
            .create_and_write(&id, stream, self.config.max_file_size)
            .await?;

        let created_at = Utc::now();
        let expires_at = created_at + Duration::seconds(self.config.ttl_secs as i64);
        let record = FileRecord {
            original_name: filename.to_string(),
            extension: extension.clone(),
            content_type,
            size_bytes,
            created_at,
            expires_at,
        };
        self.meta.insert(id.clone(), record).await;
        self.uploads.fetch_add(1, Ordering::Relaxed);
        info!(id = %id, size = size_bytes, extension = %extension, "File stored");

        Ok(UploadReceipt {
            download_path: format!("{}{}", id, extension),
            id,
            expires_at,
            original_filename: filename.to_string(),
            size_bytes,
        })
    }

    /// Resolve a download. `raw_id` may carry a trailing extension appended
    /// by the uploader's share link; the id is the portion before the first
    /// dot. Expired records and missing blobs both converge to `NotFound`.
    pub async fn get(&self, raw_id: &str) -> Result<Download> {
        let id = parse_download_id(raw_id);

        let record = self.meta.get(id).await.ok_or(StoreError::NotFound)?;

        if record.expires_at <= Utc::now() {
            debug!(id = %id, "Record expired, reclaiming on read");
            if let Err(e) = self.reclaim_one(id).await {
                warn!(id = %id, error = %e, "Failed to reclaim expired file on read");
            }
            return Err(StoreError::NotFound);
        }

        let file = match self.blobs.open(id).await {
            Ok(file) => file,
            Err(StoreError::NotFound) => {
                // Lost the race against reclamation, or the blob vanished
                // out from under us; the record must not outlive it.
                warn!(id = %id, "Blob missing for live record, dropping record");
                self.meta.remove(id).await;
                return Err(StoreError::NotFound);
            }
            Err(e) => return Err(e),
        };

        self.downloads.fetch_add(1, Ordering::Relaxed);
        Ok(Download {
            file,
            filename: download_filename(&record.original_name, &record.extension),
            content_type: record.content_type,
            size_bytes: record.size_bytes,
        })
    }

    /// Remove every record whose `expires_at <= now` together with its
    /// blob. Per-id failures are logged and skipped; the id stays in the
    /// table and is retried on the next cycle. Returns the number removed.
    pub async fn reclaim_expired(&self, now: chrono::DateTime<Utc>) -> usize {
        let expired = self.meta.snapshot_expired(now).await;
        let mut removed = 0;

        for id in expired {
            match self.reclaim_one(&id).await {
                Ok(()) => {
                    debug!(id = %id, "Reclaimed expired file");
                    removed += 1;
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Failed to reclaim expired file");
                }
            }
        }

        removed
    }

    /// The single removal primitive: blob first, then record, so a record
    /// never references a missing blob.
    async fn reclaim_one(&self, id: &str) -> Result<()> {
        self.blobs.delete(id).await?;
        if self.meta.remove(id).await.is_some() {
            self.reclaimed.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    pub async fn stats(&self) -> StoreStats {
        StoreStats {
            entries: self.meta.len().await,
            total_size_bytes: self.meta.total_size().await,
            uploads: self.uploads.load(Ordering::Relaxed),
            downloads: self.downloads.load(Ordering::Relaxed),
            reclaimed: self.reclaimed.load(Ordering::Relaxed),
        }
    }
}

/// Extract the canonical id from a path segment that may carry a trailing
/// extension. Ids are UUIDs and never contain a dot, so the portion before
/// the first dot is authoritative.
fn parse_download_id(raw: &str) -> &str {
    raw.split('.').next().unwrap_or(raw)
}

/// Compute the served filename: the original name verbatim when it already
/// ends with the stored extension (case-insensitive), otherwise its stem
/// with the stored extension appended.
fn download_filename(original_name: &str, extension: &str) -> String {
    if extension.is_empty() || original_name.to_lowercase().ends_with(extension) {
        return original_name.to_string();
    }
    let stem = Path::new(original_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| original_name.to_string());
    format!("{}{}", stem, extension)
}
