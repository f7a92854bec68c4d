//! Expiring on-disk file store with in-memory metadata
//!
//! Stores uploaded blobs on disk keyed by random identifiers, tracks their
//! metadata in memory, validates uploads against extension and MIME
//! allow-lists, and reclaims expired entries with a background task.

mod blob;
mod error;
mod meta;
mod reclaim;
mod service;
mod types;
mod validate;

pub use blob::BlobStore;
pub use error::{Result, StoreError};
pub use meta::MetadataTable;
pub use reclaim::{Reclaimer, ReclaimerHandle};
pub use service::{ContentService, Download};
pub use types::{FileRecord, StoreConfig, StoreStats, UploadReceipt};
pub use validate::{normalize_extension, validate, ALLOWED_EXTENSIONS, ALLOWED_MIME_TYPES};
