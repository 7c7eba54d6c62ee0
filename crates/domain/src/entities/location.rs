//! Tracked location entity

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, LocationId, LocationName};

/// A named, geocoded point tracked for periodic weather refresh
///
/// Created on first successful resolution of an unknown name, deleted on
/// explicit request, never mutated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique identifier, assigned on creation and immutable afterwards
    pub id: LocationId,
    /// Normalized name, the unique canonical lookup key
    pub name: LocationName,
    /// Geographic coordinates
    pub coordinates: GeoLocation,
    /// When the location was first registered
    pub created_at: DateTime<Utc>,
}

impl Location {
    /// Create a new tracked location with a fresh id
    #[must_use]
    pub fn new(name: LocationName, coordinates: GeoLocation) -> Self {
        Self {
            id: LocationId::new(),
            name,
            coordinates,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.coordinates)
    }
}
