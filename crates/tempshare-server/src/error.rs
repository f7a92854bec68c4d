//! HTTP error mapping for the tempshare server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use expiring_file_store::StoreError;
use serde_json::json;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Store(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Store(StoreError::InvalidType(msg)) => {
                (StatusCode::BAD_REQUEST, format!("Invalid file type: {}", msg))
            }
            ApiError::Store(err @ StoreError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, format!("{}", err))
            }
            ApiError::Store(StoreError::Storage(e)) => {
                tracing::error!(error = %e, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Store(StoreError::NotFound) => (
                StatusCode::NOT_FOUND,
                "File not found or has expired".to_string(),
            ),
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type_maps_to_400() {
        let response =
            ApiError::from(StoreError::InvalidType("'.exe' not allowed".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_too_large_maps_to_413() {
        let response = ApiError::from(StoreError::TooLarge { max_bytes: 1024 }).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_storage_maps_to_500() {
        let response =
            ApiError::from(StoreError::from(std::io::Error::other("disk full"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::from(StoreError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = ApiError::BadRequest("missing file field".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
