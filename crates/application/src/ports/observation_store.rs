//! Observation store port
//!
//! Defines the interface for persisting cached weather observations.

use async_trait::async_trait;
use domain::{LocationId, Observation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for observation persistence
///
/// Each location holds at most one observation; writing replaces whatever
/// was stored before.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Fetch the stored observation for a location, if any
    async fn find_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<Observation>, ApplicationError>;

    /// Insert or replace the observation for a single location
    async fn upsert(&self, observation: &Observation) -> Result<(), ApplicationError>;

    /// Insert or replace a batch of observations as one unit
    ///
    /// Either every observation in the batch is committed or none are.
    async fn upsert_batch(&self, observations: &[Observation]) -> Result<(), ApplicationError>;
}
