//! Error types for the expiring file store

use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Extension or MIME type rejected by the validation gate
    InvalidType(String),
    /// Upload exceeded the configured size cap
    TooLarge { max_bytes: u64 },
    /// Disk or I/O failure while writing or reading a blob
    Storage(Box<std::io::Error>),
    /// Unknown, expired, or already-reclaimed id
    NotFound,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidType(msg) => write!(f, "Invalid file type: {}", msg),
            StoreError::TooLarge { max_bytes } => write!(
                f,
                "File too large. Maximum size is {}MB",
                max_bytes / (1024 * 1024)
            ),
            StoreError::Storage(err) => write!(f, "Storage failure: {}", err),
            StoreError::NotFound => write!(f, "File not found or has expired"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Storage(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
