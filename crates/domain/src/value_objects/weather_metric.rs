//! Filterable weather metrics

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A weather metric that can be requested from a resolve query
///
/// Each metric maps to a fixed provider series in the observation payload;
/// the mapping lives in `HourlySeries::series`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherMetric {
    /// Air temperature at 2 meters
    Temperature,
    /// Hourly precipitation sum
    Precipitation,
    /// Mean sea-level pressure
    Pressure,
    /// Wind speed at 10 meters
    WindSpeed,
    /// Relative humidity at 2 meters
    Humidity,
}

impl WeatherMetric {
    /// Metrics returned when a query carries no explicit filters
    pub const DEFAULT_PROJECTION: [Self; 3] =
        [Self::Temperature, Self::WindSpeed, Self::Pressure];

    /// All filterable metrics
    pub const ALL: [Self; 5] = [
        Self::Temperature,
        Self::Precipitation,
        Self::Pressure,
        Self::WindSpeed,
        Self::Humidity,
    ];

    /// Query-facing name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Precipitation => "precipitation",
            Self::Pressure => "pressure",
            Self::WindSpeed => "wind_speed",
            Self::Humidity => "humidity",
        }
    }
}

impl fmt::Display for WeatherMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for WeatherMetric {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "temperature" => Ok(Self::Temperature),
            "precipitation" => Ok(Self::Precipitation),
            "pressure" => Ok(Self::Pressure),
            "wind_speed" => Ok(Self::WindSpeed),
            "humidity" => Ok(Self::Humidity),
            other => Err(DomainError::UnknownMetric(other.to_string())),
        }
    }
}
