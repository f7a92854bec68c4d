//! Concurrent in-memory metadata table
//!
//! Single shared mutable structure of the store. All access goes through an
//! async `RwLock` so inserts, lookups, removals, and the reclaimer's scan
//! are linearizable per id; readers clone records out rather than holding
//! the lock across I/O.

use crate::types::FileRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Mapping from id to file record; source of truth for what exists and
/// when it dies
#[derive(Default)]
pub struct MetadataTable {
    records: RwLock<HashMap<String, FileRecord>>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: String, record: FileRecord) {
        let mut records = self.records.write().await;
        records.insert(id, record);
    }

    pub async fn get(&self, id: &str) -> Option<FileRecord> {
        let records = self.records.read().await;
        records.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> Option<FileRecord> {
        let mut records = self.records.write().await;
        records.remove(id)
    }

    /// Point-in-time list of ids whose `expires_at <= now`. The read lock is
    /// released before the caller deletes anything, so deletion happens
    /// outside the critical section and double-removal races are benign.
    pub async fn snapshot_expired(&self, now: DateTime<Utc>) -> Vec<String> {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|(_, record)| record.expires_at <= now)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Total bytes accounted for by live records
    pub async fn total_size(&self) -> u64 {
        let records = self.records.read().await;
        records.values().map(|r| r.size_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(size: u64, expires_in_secs: i64) -> FileRecord {
        let now = Utc::now();
        FileRecord {
            original_name: "test.txt".to_string(),
            extension: ".txt".to_string(),
            content_type: Some("text/plain".to_string()),
            size_bytes: size,
            created_at: now,
            expires_at: now + Duration::seconds(expires_in_secs),
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let table = MetadataTable::new();
        assert!(table.is_empty().await);

        table.insert("a".to_string(), record(10, 60)).await;
        assert_eq!(table.len().await, 1);

        let got = table.get("a").await.unwrap();
        assert_eq!(got.size_bytes, 10);
        assert!(table.get("b").await.is_none());

        let removed = table.remove("a").await;
        assert!(removed.is_some());
        assert!(table.remove("a").await.is_none());
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_snapshot_expired() {
        let table = MetadataTable::new();
        table.insert("live".to_string(), record(1, 3600)).await;
        table.insert("dead".to_string(), record(1, -5)).await;
        table.insert("dying".to_string(), record(1, -1)).await;

        let expired = table.snapshot_expired(Utc::now()).await;
        assert_eq!(expired.len(), 2);
        assert!(expired.contains(&"dead".to_string()));
        assert!(expired.contains(&"dying".to_string()));

        // The snapshot does not remove anything by itself
        assert_eq!(table.len().await, 3);
    }

    #[tokio::test]
    async fn test_total_size() {
        let table = MetadataTable::new();
        table.insert("a".to_string(), record(10, 60)).await;
        table.insert("b".to_string(), record(32, 60)).await;
        assert_eq!(table.total_size().await, 42);
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let table = std::sync::Arc::new(MetadataTable::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let table = table.clone();
            handles.push(tokio::spawn(async move {
                table.insert(format!("id-{}", i), record(1, 60)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(table.len().await, 16);
    }
}
