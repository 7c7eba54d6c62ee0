//! Weather service
//!
//! Resolves place names to cached hourly observations, registering unknown
//! locations on the fly. Lookups prefer the stored observation and fall back
//! to the upstream provider only when the location or its observation is
//! missing.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{GeoLocation, HourOfDay, HourlySeries, Location, LocationName, Observation, WeatherMetric};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{LocationStore, ObservationStore, WeatherProviderPort},
};

/// Metric values projected from an hourly observation at a single hour
///
/// Metrics outside the requested selection stay `None` and are left out of
/// the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Normalized location name, absent for ad-hoc coordinate lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Latitude the observation was fetched for
    pub latitude: f64,
    /// Longitude the observation was fetched for
    pub longitude: f64,
    /// Hour of day the values were sampled at
    pub hour: HourOfDay,
    /// When the backing observation was fetched from upstream
    pub updated_at: DateTime<Utc>,
    /// Air temperature at 2m, in °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Precipitation sum, in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    /// Mean sea-level pressure, in hPa
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// Wind speed at 10m, in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Relative humidity at 2m, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

impl WeatherReport {
    fn at(latitude: f64, longitude: f64, hour: HourOfDay, updated_at: DateTime<Utc>) -> Self {
        Self {
            location: None,
            latitude,
            longitude,
            hour,
            updated_at,
            temperature: None,
            precipitation: None,
            pressure: None,
            wind_speed: None,
            humidity: None,
        }
    }

    fn set(&mut self, metric: WeatherMetric, value: f64) {
        match metric {
            WeatherMetric::Temperature => self.temperature = Some(value),
            WeatherMetric::Precipitation => self.precipitation = Some(value),
            WeatherMetric::Pressure => self.pressure = Some(value),
            WeatherMetric::WindSpeed => self.wind_speed = Some(value),
            WeatherMetric::Humidity => self.humidity = Some(value),
        }
    }

    /// Read a projected metric value back
    #[must_use]
    pub const fn value(&self, metric: WeatherMetric) -> Option<f64> {
        match metric {
            WeatherMetric::Temperature => self.temperature,
            WeatherMetric::Precipitation => self.precipitation,
            WeatherMetric::Pressure => self.pressure,
            WeatherMetric::WindSpeed => self.wind_speed,
            WeatherMetric::Humidity => self.humidity,
        }
    }
}

/// Service for resolving weather observations
pub struct WeatherService {
    provider: Arc<dyn WeatherProviderPort>,
    locations: Arc<dyn LocationStore>,
    observations: Arc<dyn ObservationStore>,
}

impl fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherService").finish_non_exhaustive()
    }
}

impl Clone for WeatherService {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            locations: Arc::clone(&self.locations),
            observations: Arc::clone(&self.observations),
        }
    }
}

impl WeatherService {
    /// Create a new weather service
    pub fn new(
        provider: Arc<dyn WeatherProviderPort>,
        locations: Arc<dyn LocationStore>,
        observations: Arc<dyn ObservationStore>,
    ) -> Self {
        Self {
            provider,
            locations,
            observations,
        }
    }

    /// Resolve a place name to projected metric values at one hour
    ///
    /// Serves from the stored observation when the location is known. A known
    /// location without an observation triggers a single upstream fetch; an
    /// unknown name is geocoded and registered first. An empty metric
    /// selection projects temperature, wind speed, and pressure.
    #[instrument(skip(self, metrics))]
    pub async fn resolve(
        &self,
        name: &str,
        hour: HourOfDay,
        metrics: &[WeatherMetric],
    ) -> Result<WeatherReport, ApplicationError> {
        let name = LocationName::new(name)?;

        let location = match self.locations.find_by_name(&name).await? {
            Some(location) => location,
            None => self.register_from_geocode(&name).await?,
        };

        let observation = match self.observations.find_by_location(location.id).await? {
            Some(observation) => {
                debug!(location = %location.name, "Serving stored observation");
                observation
            }
            None => self.fetch_and_store(&location).await?,
        };

        Self::build_report(&location, &observation, hour, metrics)
    }

    /// Register a location under the supplied coordinates
    ///
    /// Fetches an initial observation for new registrations. When the name is
    /// already registered the existing location is returned unchanged and the
    /// supplied coordinates are discarded. The returned flag is `true` when
    /// a new location was created.
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        name: &str,
        coordinates: GeoLocation,
    ) -> Result<(Location, bool), ApplicationError> {
        let name = LocationName::new(name)?;

        if let Some(existing) = self.locations.find_by_name(&name).await? {
            debug!(location = %existing.name, "Location already registered");
            return Ok((existing, false));
        }

        let location = Location::new(name.clone(), coordinates);
        match self.locations.insert(&location).await {
            Ok(()) => {
                self.fetch_and_store(&location).await?;
                info!(location = %location.name, "Location registered");
                Ok((location, true))
            }
            // Lost the race against a concurrent registration
            Err(ApplicationError::AlreadyExists(_)) => {
                let existing = self.find_expected(&name).await?;
                Ok((existing, false))
            }
            Err(e) => Err(e),
        }
    }

    /// List every registered location
    pub async fn list_locations(&self) -> Result<Vec<Location>, ApplicationError> {
        self.locations.list().await
    }

    /// Remove a location and its stored observation
    #[instrument(skip(self))]
    pub async fn remove_location(&self, name: &str) -> Result<(), ApplicationError> {
        let name = LocationName::new(name)?;
        self.locations.delete_by_name(&name).await?;
        info!(location = %name, "Location removed");
        Ok(())
    }

    /// Fetch current-hour values for arbitrary coordinates
    ///
    /// Goes straight to the upstream provider and projects the default
    /// metric selection at the current UTC hour. Nothing is persisted.
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    pub async fn current_at(
        &self,
        coordinates: GeoLocation,
    ) -> Result<WeatherReport, ApplicationError> {
        let hourly = self.provider.fetch_hourly(&coordinates).await?;
        let now = Utc::now();
        let hour = HourOfDay::from_datetime(&now);

        let mut report =
            WeatherReport::at(coordinates.latitude(), coordinates.longitude(), hour, now);
        Self::fill_metrics(&mut report, &hourly, hour, &[])?;
        Ok(report)
    }

    /// Geocode an unknown name and register it
    async fn register_from_geocode(
        &self,
        name: &LocationName,
    ) -> Result<Location, ApplicationError> {
        let coordinates = self.provider.geocode(name).await?;
        let location = Location::new(name.clone(), coordinates);

        match self.locations.insert(&location).await {
            Ok(()) => {
                info!(location = %location.name, "Location registered from geocode");
                Ok(location)
            }
            // Lost the race against a concurrent registration
            Err(ApplicationError::AlreadyExists(_)) => self.find_expected(name).await,
            Err(e) => Err(e),
        }
    }

    /// Re-read a location that is known to exist after a duplicate insert
    async fn find_expected(&self, name: &LocationName) -> Result<Location, ApplicationError> {
        self.locations.find_by_name(name).await?.ok_or_else(|| {
            ApplicationError::Internal(format!(
                "location '{name}' disappeared during registration"
            ))
        })
    }

    /// Fetch a fresh observation from upstream and persist it
    async fn fetch_and_store(&self, location: &Location) -> Result<Observation, ApplicationError> {
        debug!(location = %location.name, "No stored observation, fetching from upstream");
        let hourly = self.provider.fetch_hourly(&location.coordinates).await?;
        let observation = Observation::new(location.id, hourly);
        self.observations.upsert(&observation).await?;
        Ok(observation)
    }

    fn build_report(
        location: &Location,
        observation: &Observation,
        hour: HourOfDay,
        metrics: &[WeatherMetric],
    ) -> Result<WeatherReport, ApplicationError> {
        let mut report = WeatherReport::at(
            location.coordinates.latitude(),
            location.coordinates.longitude(),
            hour,
            observation.updated_at,
        );
        report.location = Some(location.name.to_string());
        Self::fill_metrics(&mut report, &observation.hourly, hour, metrics)?;
        Ok(report)
    }

    fn fill_metrics(
        report: &mut WeatherReport,
        hourly: &HourlySeries,
        hour: HourOfDay,
        metrics: &[WeatherMetric],
    ) -> Result<(), ApplicationError> {
        let selected: &[WeatherMetric] = if metrics.is_empty() {
            &WeatherMetric::DEFAULT_PROJECTION
        } else {
            metrics
        };

        for metric in selected {
            let value = hourly.sample(*metric, hour).ok_or_else(|| {
                ApplicationError::Internal(format!(
                    "stored observation has no {metric} sample at {hour}"
                ))
            })?;
            report.set(*metric, value);
        }
        Ok(())
    }
}
