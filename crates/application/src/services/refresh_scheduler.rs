//! Refresh scheduler
//!
//! Drives refresh cycles on a fixed interval in a background task. The first
//! cycle runs immediately on start; each following cycle begins a full
//! interval after the previous one finished.

use std::{fmt, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{error::ApplicationError, services::RefreshService};

/// Periodic driver for the refresh service
#[derive(Debug)]
pub struct RefreshScheduler {
    service: Arc<RefreshService>,
    interval: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// Create a scheduler that runs a refresh cycle every `interval`
    pub fn new(service: Arc<RefreshService>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            worker: Mutex::new(None),
        }
    }

    /// Spawn the background worker
    ///
    /// Returns without blocking; the first cycle starts right away. Calling
    /// `start` while a worker is already running is a no-op.
    pub fn start(&self) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            warn!("Refresh scheduler already running");
            return;
        }

        info!(
            interval_secs = self.interval.as_secs(),
            "Starting refresh scheduler"
        );

        let service = Arc::clone(&self.service);
        let interval = self.interval;
        *worker = Some(tokio::spawn(async move {
            loop {
                // A failed cycle is logged and the loop keeps going; the
                // pause is measured from the end of the cycle, not its start.
                if let Err(e) = service.refresh_all().await {
                    error!(error = %e, "Refresh cycle failed");
                }
                tokio::time::sleep(interval).await;
            }
        }));
    }

    /// Cancel the background worker and wait for it to wind down
    ///
    /// Stopping an idle scheduler is a no-op. Cancellation itself is the
    /// expected way the worker ends; any other worker failure is surfaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker task had already failed for a reason
    /// other than being cancelled.
    pub async fn stop(&self) -> Result<(), ApplicationError> {
        let worker = self.worker.lock().take();
        let Some(worker) = worker else {
            return Ok(());
        };

        worker.abort();
        match worker.await {
            Err(e) if !e.is_cancelled() => Err(ApplicationError::Internal(format!(
                "refresh scheduler worker failed: {e}"
            ))),
            _ => {
                info!("Refresh scheduler stopped");
                Ok(())
            }
        }
    }

    /// Whether a worker is currently running
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }
}

impl fmt::Display for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "refresh scheduler (every {}s)",
            self.interval.as_secs()
        )
    }
}
