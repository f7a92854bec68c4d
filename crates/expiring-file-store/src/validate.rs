//! Upload validation gate
//!
//! Pure checks of a candidate upload's extension and content type against
//! static allow-lists. No state, no side effects.

use crate::error::{Result, StoreError};

/// Extensions accepted for upload (normalized: lowercase, leading dot)
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    // Documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".ods", ".odp", ".rtf",
    ".txt", ".csv", ".md", ".html", ".htm", ".css",
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp", ".tiff", ".tif", ".ico", ".heic",
    ".heif",
    // Audio
    ".mp3", ".wav", ".ogg", ".aac", ".flac", ".m4a", ".weba",
    // Video
    ".mp4", ".mpeg", ".mpg", ".mov", ".avi", ".webm", ".ogv", ".mkv",
    // Archives
    ".zip", ".rar", ".7z", ".gz", ".tar", ".bz2",
    // Code
    ".json", ".xml", ".js", ".ts", ".tsx", ".jsx", ".py", ".java", ".c", ".cpp", ".cs", ".h",
    ".hpp", ".yaml", ".yml", ".go", ".rs", ".rb", ".php", ".swift", ".kt", ".sh", ".bash",
];

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    // Documents
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.oasis.opendocument.text",
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/vnd.oasis.opendocument.presentation",
    "application/rtf",
    "text/plain",
    "text/csv",
    "text/markdown",
    "text/html",
    "text/css",
    // Images
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
    "image/bmp",
    "image/tiff",
    "image/x-icon",
    "image/heic",
    "image/heif",
    // Audio
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/ogg",
    "audio/aac",
    "audio/flac",
    "audio/m4a",
    "audio/webm",
    // Video
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    "video/webm",
    "video/ogg",
    "video/x-matroska",
    // Archives
    "application/zip",
    "application/x-zip-compressed",
    "application/x-rar-compressed",
    "application/x-7z-compressed",
    "application/gzip",
    "application/x-tar",
    "application/x-bzip2",
    // Code
    "application/json",
    "application/xml",
    "text/xml",
    "application/javascript",
    "text/javascript",
    "application/typescript",
    "text/x-python",
    "text/x-java-source",
    "text/x-c",
    "text/x-c++",
    "text/x-csharp",
    "application/x-yaml",
    "text/yaml",
    // Generic binary
    "application/octet-stream",
];

/// Normalize an extension to lowercase with a leading dot.
pub fn normalize_extension(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() || lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Validate a normalized extension and optional content type against the
/// allow-lists. An absent content type is accepted as unknown binary.
pub fn validate(extension: &str, content_type: Option<&str>) -> Result<()> {
    if extension.is_empty() || !ALLOWED_EXTENSIONS.contains(&extension) {
        let mut allowed: Vec<&str> = ALLOWED_EXTENSIONS.to_vec();
        allowed.sort_unstable();
        return Err(StoreError::InvalidType(format!(
            "file type '{}' not allowed. Allowed types: {}",
            extension,
            allowed.join(", ")
        )));
    }

    if let Some(mime) = content_type {
        if !ALLOWED_MIME_TYPES.contains(&mime) {
            return Err(StoreError::InvalidType(format!(
                "content type '{}' not allowed",
                mime
            )));
        }
    }

    Ok(())
}
