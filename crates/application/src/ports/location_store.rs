//! Location store port
//!
//! Defines the interface for persisting registered locations.

use async_trait::async_trait;
use domain::{Location, LocationName};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for location persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// List every registered location
    async fn list(&self) -> Result<Vec<Location>, ApplicationError>;

    /// Look up a location by its normalized name
    async fn find_by_name(
        &self,
        name: &LocationName,
    ) -> Result<Option<Location>, ApplicationError>;

    /// Insert a new location
    ///
    /// Returns `ApplicationError::AlreadyExists` when a location with the
    /// same name is already registered.
    async fn insert(&self, location: &Location) -> Result<(), ApplicationError>;

    /// Delete a location and its stored observation
    ///
    /// Returns `ApplicationError::NotFound` when no location with the name
    /// exists.
    async fn delete_by_name(&self, name: &LocationName) -> Result<(), ApplicationError>;
}
