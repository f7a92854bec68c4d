//! Tempshare - temporary file sharing service
//!
//! Accepts uploads, hands out short-lived download links, and purges
//! files after a fixed time-to-live.

mod error;
mod server;
mod types;

use crate::server::{start_server, ServerState, SharedState};
use crate::types::ServerConfig;
use expiring_file_store::{ContentService, Reclaimer, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("tempshare_server=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Tempshare server...");

    // Load configuration from environment
    let (server_config, store_config) = load_config();
    info!("Port: {}", server_config.port);
    info!("Storage dir: {:?}", store_config.storage_dir);
    info!("File TTL: {} seconds", store_config.ttl_secs);
    info!(
        "Max file size: {} MB",
        store_config.max_file_size / (1024 * 1024)
    );
    info!(
        "Reclaim interval: {} seconds",
        store_config.reclaim_interval_secs
    );

    // Create the content store
    let reclaim_interval = Duration::from_secs(store_config.reclaim_interval_secs);
    let service = Arc::new(ContentService::new(store_config));
    service.init().await?;

    // Spawn the background reclaimer
    let reclaimer = Reclaimer::spawn(service.clone(), reclaim_interval);

    // Create shared state and run the HTTP server until shutdown
    let state: SharedState = Arc::new(ServerState::new(service));
    tokio::select! {
        result = start_server(state, server_config.port) => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    // Let an in-flight reclamation cycle finish before exiting
    reclaimer.shutdown().await;
    info!("Tempshare server stopped");

    Ok(())
}

fn load_config() -> (ServerConfig, StoreConfig) {
    let defaults = StoreConfig::default();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let storage_dir = std::env::var("STORAGE_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.storage_dir);

    let ttl_secs = std::env::var("FILE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.ttl_secs);

    let max_file_size = std::env::var("MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.max_file_size);

    let reclaim_interval_secs = std::env::var("RECLAIM_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(defaults.reclaim_interval_secs);

    (
        ServerConfig { port },
        StoreConfig {
            storage_dir,
            ttl_secs,
            max_file_size,
            reclaim_interval_secs,
        },
    )
}
