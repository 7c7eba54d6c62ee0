//! Cached weather observation entity

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{HourOfDay, LocationId, WeatherMetric};

/// Hourly time series for one local day, keyed by provider metric
///
/// The five fixed series each carry one sample per hour of day, selected by
/// index 0-23. Provider fields outside the fixed set (`time`,
/// `wind_direction_10m`, ...) are retained opaquely in `extra` so the stored
/// payload stays faithful to what the provider returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    /// Air temperature at 2 meters, one sample per hour
    #[serde(default)]
    pub temperature_2m: Vec<f64>,
    /// Relative humidity at 2 meters, one sample per hour
    #[serde(default)]
    pub relative_humidity_2m: Vec<f64>,
    /// Mean sea-level pressure, one sample per hour
    #[serde(default)]
    pub pressure_msl: Vec<f64>,
    /// Wind speed at 10 meters, one sample per hour
    #[serde(default)]
    pub wind_speed_10m: Vec<f64>,
    /// Precipitation sum, one sample per hour
    #[serde(default)]
    pub precipitation: Vec<f64>,
    /// Provider fields not in the fixed metric set
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl HourlySeries {
    /// The fixed series backing a filterable metric
    #[must_use]
    pub fn series(&self, metric: WeatherMetric) -> &[f64] {
        match metric {
            WeatherMetric::Temperature => &self.temperature_2m,
            WeatherMetric::Humidity => &self.relative_humidity_2m,
            WeatherMetric::Pressure => &self.pressure_msl,
            WeatherMetric::WindSpeed => &self.wind_speed_10m,
            WeatherMetric::Precipitation => &self.precipitation,
        }
    }

    /// Sample one metric at the given hour
    ///
    /// Returns `None` when the stored series is shorter than the hour index,
    /// which means the provider payload violated the 24-sample contract.
    #[must_use]
    pub fn sample(&self, metric: WeatherMetric, hour: HourOfDay) -> Option<f64> {
        self.series(metric).get(hour.index()).copied()
    }
}

/// The single current cached weather payload for a location
///
/// One observation record exists per location (upsert semantics, not
/// append-only history); it is destroyed only via cascade when its location
/// is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Owning location
    pub location_id: LocationId,
    /// Hourly series payload for the location's current local day
    pub hourly: HourlySeries,
    /// When the payload was last written, non-decreasing per location
    pub updated_at: DateTime<Utc>,
}

impl Observation {
    /// Create an observation from a freshly fetched payload
    #[must_use]
    pub fn new(location_id: LocationId, hourly: HourlySeries) -> Self {
        Self {
            location_id,
            hourly,
            updated_at: Utc::now(),
        }
    }

    /// Replace the payload and advance the update timestamp
    pub fn refresh(&mut self, hourly: HourlySeries) {
        self.hourly = hourly;
        self.updated_at = Utc::now();
    }
}
