//! Geographic coordinate value object
//!
//! Decimal-degree coordinates as the upstream forecast API consumes them.
//! Construction validates the WGS84 ranges once so every later use can rely
//! on the values being plausible.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Coordinates outside the valid latitude/longitude ranges
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid coordinates: ({0}, {1}) is outside latitude -90..=90, longitude -180..=180")]
pub struct InvalidCoordinates(f64, f64);

/// A point on the globe in decimal degrees
///
/// Values are held as provided; no rounding or grid snapping happens here,
/// that is the forecast provider's business.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

impl GeoLocation {
    /// Create validated coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` when latitude falls outside [-90, 90] or
    /// longitude outside [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !LATITUDE_RANGE.contains(&latitude) || !LONGITUDE_RANGE.contains(&longitude) {
            return Err(InvalidCoordinates(latitude, longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create coordinates that are already known to be in range
    ///
    /// For literals and values read back from storage, where the ranges were
    /// enforced on the way in.
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in decimal degrees
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
