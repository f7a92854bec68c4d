//! HTTP server for the tempshare endpoints
//!
//! Provides /upload, /download/{id}, /health, and a root usage message.
//! All file semantics live in the content store; this layer only adapts
//! multipart bodies and HTTP responses.

use crate::error::ApiError;
use crate::types::{HealthResponse, UploadParams, UploadResponse};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use expiring_file_store::ContentService;
use futures_util::TryStreamExt;
use serde_json::json;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state for the HTTP server
pub struct ServerState {
    pub service: Arc<ContentService>,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(service: Arc<ContentService>) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/download/{id}", get(download))
        // The store enforces the size cap incrementally while streaming
        .layer(DefaultBodyLimit::disable())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Temporary File Share API - Use /upload to upload files and /download/{id} to download them"
    }))
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let store = state.service.stats().await;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        store,
    })
}

/// Upload a file and get a shareable link. Extension and MIME overrides
/// ride on the query string so validation can run before the body is
/// consumed.
async fn upload(
    State(state): State<SharedState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("No filename provided".to_string()))?;
        let field_content_type = field.content_type().map(str::to_string);

        let stream = field.map_err(std::io::Error::other);
        let receipt = state
            .service
            .put(
                &filename,
                params.file_extension.as_deref(),
                params.mime_type.as_deref(),
                field_content_type.as_deref(),
                stream,
            )
            .await?;

        return Ok(Json(UploadResponse {
            download_url: format!("/download/{}", receipt.download_path),
            file_id: receipt.id,
            expires_at: receipt.expires_at,
            original_filename: receipt.original_filename,
            file_size: receipt.size_bytes,
        }));
    }

    Err(ApiError::BadRequest("No file provided".to_string()))
}

/// Download a file by its id (with optional extension in the path)
async fn download(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let dl = state.service.get(&id).await?;

    let content_type = dl
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let body = Body::from_stream(ReaderStream::new(dl.file));

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, dl.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", dl.filename),
        )
        .body(body)
        .unwrap()
        .into_response())
}
