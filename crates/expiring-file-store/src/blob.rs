//! On-disk blob storage
//!
//! Owns the byte lifecycle of stored files. Blobs are addressed solely by
//! their id, never by the untrusted client filename, so concurrent uploads
//! cannot contend on a path and path traversal is impossible.

use crate::error::{Result, StoreError};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// File-backed blob store, one opaque file per id
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Ensure the storage directory exists
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!(storage_dir = ?self.root, "Blob store initialized");
        Ok(())
    }

    /// Path of the blob for an id. Ids are generated by the service and
    /// contain no path separators.
    pub fn blob_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Stream `stream` into a new blob file, enforcing `max_bytes`
    /// incrementally. On a cap violation or any I/O error the partial file
    /// is removed before the error is returned, so a failed upload never
    /// leaves an artifact on disk.
    pub async fn create_and_write<S>(&self, id: &str, stream: S, max_bytes: u64) -> Result<u64>
    where
        S: Stream<Item = std::io::Result<Bytes>>,
    {
        let path = self.blob_path(id);
        let mut file = fs::File::create(&path).await?;

        tokio::pin!(stream);
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    Self::discard_partial(&path).await;
                    return Err(e.into());
                }
            };

            written += chunk.len() as u64;
            if written > max_bytes {
                drop(file);
                Self::discard_partial(&path).await;
                return Err(StoreError::TooLarge { max_bytes });
            }

            if let Err(e) = file.write_all(&chunk).await {
                drop(file);
                Self::discard_partial(&path).await;
                return Err(e.into());
            }
        }

        if let Err(e) = file.flush().await {
            drop(file);
            Self::discard_partial(&path).await;
            return Err(e.into());
        }

        debug!(id = %id, size = written, "Blob written");
        Ok(written)
    }

    /// Open a blob for reading. A missing file maps to `NotFound` since the
    /// blob may have been reclaimed between lookup and open.
    pub async fn open(&self, id: &str) -> Result<fs::File> {
        match fs::File::open(self.blob_path(id)).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a blob. Idempotent: deleting a missing id is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.blob_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, id: &str) -> bool {
        fs::try_exists(self.blob_path(id)).await.unwrap_or(false)
    }

    async fn discard_partial(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = ?path, error = %e, "Failed to remove partial blob");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use tempfile::tempdir;

    fn byte_stream(chunks: Vec<&'static [u8]>) -> impl Stream<Item = std::io::Result<Bytes>> {
        stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from_static(c))))
    }

    #[tokio::test]
    async fn test_write_and_open() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().to_path_buf());
        store.init().await.unwrap();

        let size = store
            .create_and_write("abc", byte_stream(vec![b"hello ", b"world"]), 1024)
            .await
            .unwrap();
        assert_eq!(size, 11);
        assert!(store.exists("abc").await);

        let data = fs::read(store.blob_path("abc")).await.unwrap();
        assert_eq!(data, b"hello world");
        assert!(store.open("abc").await.is_ok());
    }

    #[tokio::test]
    async fn test_size_cap_leaves_no_partial() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().to_path_buf());
        store.init().await.unwrap();

        let result = store
            .create_and_write("big", byte_stream(vec![b"0123456789", b"0123456789"]), 15)
            .await;

        assert!(matches!(result, Err(StoreError::TooLarge { max_bytes: 15 })));
        assert!(!store.exists("big").await);
    }

    #[tokio::test]
    async fn test_exact_cap_is_allowed() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().to_path_buf());
        store.init().await.unwrap();

        let size = store
            .create_and_write("exact", byte_stream(vec![b"0123456789"]), 10)
            .await
            .unwrap();
        assert_eq!(size, 10);
        assert!(store.exists("exact").await);
    }

    #[tokio::test]
    async fn test_stream_error_leaves_no_partial() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().to_path_buf());
        store.init().await.unwrap();

        let broken = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection dropped")),
        ]);

        let result = store.create_and_write("drop", broken, 1024).await;
        assert!(matches!(result, Err(StoreError::Storage(_))));
        assert!(!store.exists("drop").await);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().to_path_buf());
        store.init().await.unwrap();

        store
            .create_and_write("gone", byte_stream(vec![b"x"]), 1024)
            .await
            .unwrap();

        store.delete("gone").await.unwrap();
        assert!(!store.exists("gone").await);

        // Second delete of the same id is not an error
        store.delete("gone").await.unwrap();
        store.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_open_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().to_path_buf());
        store.init().await.unwrap();

        assert!(matches!(store.open("nope").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_stream_writes_empty_blob() {
        let dir = tempdir().unwrap();
        let store = BlobStore::new(dir.path().to_path_buf());
        store.init().await.unwrap();

        let size = store
            .create_and_write("empty", byte_stream(vec![]), 1024)
            .await
            .unwrap();
        assert_eq!(size, 0);
        assert!(store.exists("empty").await);
    }
}
