//! Background TTL reclamation
//!
//! A single long-running task that sweeps expired files at a fixed
//! interval. Shutdown is cooperative: signalling the handle lets an
//! in-flight cycle finish before the task exits.

use crate::service::ContentService;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

pub struct Reclaimer;

/// Handle to a spawned reclaimer task
pub struct ReclaimerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Reclaimer {
    /// Spawn the reclamation loop on the current runtime.
    pub fn spawn(service: Arc<ContentService>, period: Duration) -> ReclaimerHandle {
        let (shutdown, mut signal) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            info!(period_secs = period.as_secs(), "Reclaimer started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = service.reclaim_expired(Utc::now()).await;
                        if removed > 0 {
                            info!(removed, "Reclaimed expired files");
                        } else {
                            debug!("Reclamation cycle found nothing expired");
                        }
                    }
                    _ = signal.changed() => {
                        info!("Reclaimer shutting down");
                        break;
                    }
                }
            }
        });

        ReclaimerHandle { shutdown, task }
    }
}

impl ReclaimerHandle {
    /// Signal the loop to stop and wait for it to exit. An in-flight cycle
    /// runs to completion first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
