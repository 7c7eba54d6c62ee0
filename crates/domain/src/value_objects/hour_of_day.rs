//! Hour-of-day value object
//!
//! Represents a validated hour of the local day (0-23), used to index the
//! 24-sample hourly series of an observation. Out-of-range hours are
//! rejected at construction; there is deliberately no wrapping or clamping.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::HourOfDay;
//!
//! let hour = HourOfDay::new(14).expect("valid hour");
//! assert_eq!(hour.index(), 14);
//!
//! assert!(HourOfDay::new(24).is_err());
//! ```

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when an hour value is out of range
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid hour: {0} is out of range (must be 0-23)")]
pub struct InvalidHour(u8);

/// An hour of the local day (0-23)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Latest valid hour
    pub const MAX: u8 = 23;

    /// Create a validated hour of day
    ///
    /// # Errors
    ///
    /// Returns `InvalidHour` if the value is greater than 23.
    pub const fn new(value: u8) -> Result<Self, InvalidHour> {
        if value > Self::MAX {
            Err(InvalidHour(value))
        } else {
            Ok(Self(value))
        }
    }

    /// The hour of day for a timestamp, in that timestamp's timezone
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_datetime<Tz: chrono::TimeZone>(at: &chrono::DateTime<Tz>) -> Self {
        // chrono guarantees hour() is 0-23
        Self(at.hour() as u8)
    }

    /// Get the hour as a u8
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Series index for this hour
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl TryFrom<u8> for HourOfDay {
    type Error = InvalidHour;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HourOfDay> for u8 {
    fn from(hour: HourOfDay) -> Self {
        hour.0
    }
}

/// Custom deserialization that validates the hour range
impl<'de> Deserialize<'de> for HourOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
