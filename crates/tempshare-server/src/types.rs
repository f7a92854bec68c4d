//! Wire types for the tempshare server

use chrono::{DateTime, Utc};
use expiring_file_store::StoreStats;
use serde::{Deserialize, Serialize};

/// Server configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

/// Response to a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub download_url: String,
    pub expires_at: DateTime<Utc>,
    pub original_filename: String,
    pub file_size: u64,
}

/// Optional overrides accepted on the upload query string
#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    pub file_extension: Option<String>,
    pub mime_type: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub store: StoreStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_upload_response_serialization() {
        let response = UploadResponse {
            file_id: "abc-123".to_string(),
            download_url: "/download/abc-123.txt".to_string(),
            expires_at: Utc::now(),
            original_filename: "notes.txt".to_string(),
            file_size: 10,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("abc-123"));
        assert!(json.contains("/download/abc-123.txt"));
        assert!(json.contains("notes.txt"));
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            uptime_secs: 3600,
            store: StoreStats::default(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ok"));
        assert!(json.contains("3600"));
        assert!(json.contains("entries"));
    }

    #[test]
    fn test_upload_params_deserialization() {
        let params: UploadParams =
            serde_json::from_str(r#"{"file_extension": ".txt", "mime_type": "text/plain"}"#)
                .unwrap();
        assert_eq!(params.file_extension.as_deref(), Some(".txt"));
        assert_eq!(params.mime_type.as_deref(), Some("text/plain"));

        let empty: UploadParams = serde_json::from_str("{}").unwrap();
        assert!(empty.file_extension.is_none());
        assert!(empty.mime_type.is_none());
    }
}
