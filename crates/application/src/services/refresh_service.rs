//! Refresh service
//!
//! Re-fetches observations for every registered location in one pass. Fetches
//! run concurrently under a cap; failures are captured per location and the
//! successful subset is committed as a single batch.

use std::{fmt, sync::Arc, time::Duration};

use futures::StreamExt;
use tracing::{debug, info, instrument, warn};

use domain::Observation;

use crate::{
    error::ApplicationError,
    ports::{LocationStore, ObservationStore, WeatherProviderPort},
};

/// Tuning for refresh cycles
#[derive(Debug, Clone, Copy)]
pub struct RefreshConfig {
    /// Pause between cycles, measured from the end of the previous cycle
    /// (default: 15 minutes)
    pub interval: Duration,
    /// Maximum number of locations fetched concurrently (default: 4)
    pub max_concurrency: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(900),
            max_concurrency: 4,
        }
    }
}

/// One location that could not be refreshed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    /// Normalized location name
    pub location: String,
    /// Upstream failure description
    pub reason: String,
}

/// Outcome of a single refresh cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Number of registered locations at the start of the cycle
    pub total: usize,
    /// Number of observations committed
    pub updated: usize,
    /// Locations whose fetch failed this cycle
    pub failures: Vec<RefreshFailure>,
}

/// Service that refreshes stored observations
pub struct RefreshService {
    provider: Arc<dyn WeatherProviderPort>,
    locations: Arc<dyn LocationStore>,
    observations: Arc<dyn ObservationStore>,
    max_concurrency: usize,
}

impl fmt::Debug for RefreshService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshService")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl RefreshService {
    /// Create a new refresh service
    pub fn new(
        provider: Arc<dyn WeatherProviderPort>,
        locations: Arc<dyn LocationStore>,
        observations: Arc<dyn ObservationStore>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            provider,
            locations,
            observations,
            // A zero cap would stall the stream
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Refresh the observation of every registered location
    ///
    /// The location list is snapshotted once at the start; registrations that
    /// land mid-cycle wait for the next one. A failed fetch never aborts the
    /// cycle, and everything that succeeded is committed in one batch.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> Result<RefreshSummary, ApplicationError> {
        let locations = self.locations.list().await?;
        let total = locations.len();
        if total == 0 {
            debug!("No locations registered, skipping refresh cycle");
            return Ok(RefreshSummary::default());
        }

        let outcomes: Vec<_> = futures::stream::iter(locations)
            .map(|location| {
                let provider = Arc::clone(&self.provider);
                async move {
                    let outcome = provider.fetch_hourly(&location.coordinates).await;
                    (location, outcome)
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut fresh = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (location, outcome) in outcomes {
            match outcome {
                Ok(hourly) => fresh.push(Observation::new(location.id, hourly)),
                Err(e) => {
                    warn!(location = %location.name, error = %e, "Refresh fetch failed");
                    failures.push(RefreshFailure {
                        location: location.name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !fresh.is_empty() {
            self.observations.upsert_batch(&fresh).await?;
        }

        info!(updated = fresh.len(), total, "Refresh cycle complete");
        Ok(RefreshSummary {
            total,
            updated: fresh.len(),
            failures,
        })
    }
}
