//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use application::{
    WeatherService,
    error::{ApplicationError, UpstreamError},
    ports::{LocationStore, ObservationStore, WeatherProviderPort},
};
use async_trait::async_trait;
use axum_test::TestServer;
use domain::{GeoLocation, HourlySeries, Location, LocationId, LocationName, Observation};
use presentation_http::{routes::create_router, state::AppState};
use serde_json::json;
use tokio::sync::RwLock;

// ============ Test Doubles ============

#[derive(Debug, Default)]
struct InMemoryLocationStore {
    locations: RwLock<HashMap<String, Location>>,
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn list(&self) -> Result<Vec<Location>, ApplicationError> {
        let mut locations: Vec<Location> =
            self.locations.read().await.values().cloned().collect();
        locations.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(locations)
    }

    async fn find_by_name(
        &self,
        name: &LocationName,
    ) -> Result<Option<Location>, ApplicationError> {
        Ok(self.locations.read().await.get(name.as_str()).cloned())
    }

    async fn insert(&self, location: &Location) -> Result<(), ApplicationError> {
        let mut locations = self.locations.write().await;
        if locations.contains_key(location.name.as_str()) {
            return Err(ApplicationError::AlreadyExists(format!(
                "Location {} already tracked",
                location.name
            )));
        }
        locations.insert(location.name.as_str().to_string(), location.clone());
        Ok(())
    }

    async fn delete_by_name(&self, name: &LocationName) -> Result<(), ApplicationError> {
        self.locations
            .write()
            .await
            .remove(name.as_str())
            .map(|_| ())
            .ok_or_else(|| ApplicationError::NotFound(format!("Location {name} not found")))
    }
}

#[derive(Debug, Default)]
struct InMemoryObservationStore {
    observations: RwLock<HashMap<LocationId, Observation>>,
}

#[async_trait]
impl ObservationStore for InMemoryObservationStore {
    async fn find_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<Observation>, ApplicationError> {
        Ok(self.observations.read().await.get(&location_id).cloned())
    }

    async fn upsert(&self, observation: &Observation) -> Result<(), ApplicationError> {
        self.observations
            .write()
            .await
            .insert(observation.location_id, observation.clone());
        Ok(())
    }

    async fn upsert_batch(&self, observations: &[Observation]) -> Result<(), ApplicationError> {
        let mut store = self.observations.write().await;
        for observation in observations {
            store.insert(observation.location_id, observation.clone());
        }
        Ok(())
    }
}

/// Location store whose every call fails, for readiness testing
#[derive(Debug, Default)]
struct FailingLocationStore;

#[async_trait]
impl LocationStore for FailingLocationStore {
    async fn list(&self) -> Result<Vec<Location>, ApplicationError> {
        Err(ApplicationError::Storage("database is gone".to_string()))
    }

    async fn find_by_name(
        &self,
        _name: &LocationName,
    ) -> Result<Option<Location>, ApplicationError> {
        Err(ApplicationError::Storage("database is gone".to_string()))
    }

    async fn insert(&self, _location: &Location) -> Result<(), ApplicationError> {
        Err(ApplicationError::Storage("database is gone".to_string()))
    }

    async fn delete_by_name(&self, _name: &LocationName) -> Result<(), ApplicationError> {
        Err(ApplicationError::Storage("database is gone".to_string()))
    }
}

/// Scripted upstream provider counting how often it is called
#[derive(Debug)]
struct StubProvider {
    coordinates: Option<GeoLocation>,
    fetch_error: Option<UpstreamError>,
    geocode_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl StubProvider {
    fn new() -> Self {
        Self {
            coordinates: Some(GeoLocation::new(48.85, 2.35).expect("valid coordinates")),
            fetch_error: None,
            geocode_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// A provider that recognizes no place names
    fn unknown_places() -> Self {
        Self {
            coordinates: None,
            ..Self::new()
        }
    }

    /// A provider whose forecast endpoint always fails
    fn failing_with(error: UpstreamError) -> Self {
        Self {
            fetch_error: Some(error),
            ..Self::new()
        }
    }
}

#[async_trait]
impl WeatherProviderPort for StubProvider {
    async fn geocode(&self, name: &LocationName) -> Result<GeoLocation, ApplicationError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        self.coordinates
            .ok_or_else(|| ApplicationError::LocationNotFound(name.to_string()))
    }

    async fn fetch_hourly(&self, _at: &GeoLocation) -> Result<HourlySeries, ApplicationError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        match &self.fetch_error {
            Some(error) => Err(error.clone().into()),
            None => Ok(test_series()),
        }
    }
}

/// A 24-value series rising by `step` each hour
fn rising(start: f64, step: f64) -> Vec<f64> {
    (0..24).map(|hour| start + f64::from(hour) * step).collect()
}

fn test_series() -> HourlySeries {
    let mut temperature = rising(9.5, 0.1);
    temperature[14] = 12.3;

    HourlySeries {
        temperature_2m: temperature,
        relative_humidity_2m: rising(50.0, 1.0),
        pressure_msl: rising(1000.0, 0.5),
        wind_speed_10m: rising(5.0, 0.25),
        precipitation: vec![0.0; 24],
        extra: BTreeMap::new(),
    }
}

struct TestContext {
    server: TestServer,
    provider: Arc<StubProvider>,
}

fn test_context_with(provider: StubProvider) -> TestContext {
    let provider = Arc::new(provider);
    let provider_port: Arc<dyn WeatherProviderPort> = provider.clone();
    let locations: Arc<dyn LocationStore> = Arc::new(InMemoryLocationStore::default());
    let observations: Arc<dyn ObservationStore> = Arc::new(InMemoryObservationStore::default());

    let state = AppState {
        weather_service: Arc::new(WeatherService::new(provider_port, locations, observations)),
    };

    let server = TestServer::new(create_router(state)).expect("Failed to create test server");
    TestContext { server, provider }
}

fn test_context() -> TestContext {
    test_context_with(StubProvider::new())
}

// ============ Health Tests ============

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let ctx = test_context();

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn readiness_endpoint_reports_storage() {
    let ctx = test_context();

    let response = ctx.server.get("/ready").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["storage"]["healthy"], true);
    assert_eq!(body["storage"]["tracked_locations"], 0);
}

#[tokio::test]
async fn readiness_endpoint_degrades_when_storage_fails() {
    let provider = Arc::new(StubProvider::new());
    let provider_port: Arc<dyn WeatherProviderPort> = provider.clone();
    let locations: Arc<dyn LocationStore> = Arc::new(FailingLocationStore);
    let observations: Arc<dyn ObservationStore> = Arc::new(InMemoryObservationStore::default());

    let state = AppState {
        weather_service: Arc::new(WeatherService::new(provider_port, locations, observations)),
    };
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    let response = server.get("/ready").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], false);
    assert_eq!(body["storage"]["healthy"], false);
}

// ============ Location Tests ============

#[tokio::test]
async fn register_normalizes_the_name() {
    let ctx = test_context();

    let response = ctx
        .server
        .post("/v1/locations")
        .json(&json!({"name": "  pArIs ", "latitude": 48.85, "longitude": 2.35}))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Paris");
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn register_is_idempotent_across_casing() {
    let ctx = test_context();

    let first = ctx
        .server
        .post("/v1/locations")
        .json(&json!({"name": "paris", "latitude": 48.85, "longitude": 2.35}))
        .await;
    first.assert_status(axum::http::StatusCode::CREATED);
    let first_body: serde_json::Value = first.json();
    let id = first_body["id"].as_str().expect("id present").to_string();

    // A repeat under different casing answers 200 with the stored record,
    // and its coordinates win over the newly supplied ones.
    let second = ctx
        .server
        .post("/v1/locations")
        .json(&json!({"name": " PARIS ", "latitude": 1.0, "longitude": 1.0}))
        .await;
    second.assert_status_ok();

    let second_body: serde_json::Value = second.json();
    assert_eq!(second_body["id"], id.as_str());
    assert_eq!(second_body["latitude"], 48.85);

    // Registration seeded one observation; the repeat reused it
    assert_eq!(ctx.provider.fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.provider.geocode_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_rejects_out_of_range_latitude() {
    let ctx = test_context();

    let response = ctx
        .server
        .post("/v1/locations")
        .json(&json!({"name": "Paris", "latitude": 91.0, "longitude": 2.35}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn register_rejects_blank_name() {
    let ctx = test_context();

    // Whitespace passes the length check but normalizes to nothing
    let response = ctx
        .server
        .post("/v1/locations")
        .json(&json!({"name": "   ", "latitude": 48.85, "longitude": 2.35}))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn list_returns_locations_ordered_by_name() {
    let ctx = test_context();

    for name in ["Tokyo", "Berlin"] {
        ctx.server
            .post("/v1/locations")
            .json(&json!({"name": name, "latitude": 10.0, "longitude": 10.0}))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let response = ctx.server.get("/v1/locations").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Berlin", "Tokyo"]);
}

#[tokio::test]
async fn delete_removes_a_tracked_location() {
    let ctx = test_context();

    ctx.server
        .post("/v1/locations")
        .json(&json!({"name": "Paris", "latitude": 48.85, "longitude": 2.35}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    // Deletion accepts any casing of the stored name
    let response = ctx.server.delete("/v1/locations/paris").await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    let list: serde_json::Value = ctx.server.get("/v1/locations").await.json();
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn delete_unknown_location_answers_not_found() {
    let ctx = test_context();

    let response = ctx.server.delete("/v1/locations/Atlantis").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "not_found");
}

// ============ Weather Tests ============

#[tokio::test]
async fn weather_answers_from_the_cached_observation() {
    let ctx = test_context();

    ctx.server
        .post("/v1/locations")
        .json(&json!({"name": "Paris", "latitude": 48.85, "longitude": 2.35}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = ctx.server.get("/v1/weather?location=Paris&hour=14").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["location"], "Paris");
    assert_eq!(body["hour"], 14);
    assert_eq!(body["temperature"], 12.3);

    // Default projection: temperature, wind speed, pressure
    assert!(body.get("wind_speed").is_some());
    assert!(body.get("pressure").is_some());
    assert!(body.get("humidity").is_none());
    assert!(body.get("precipitation").is_none());

    // Registration already fetched; the lookup was served from the cache
    assert_eq!(ctx.provider.fetch_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn weather_projects_the_requested_metrics() {
    let ctx = test_context();

    ctx.server
        .post("/v1/locations")
        .json(&json!({"name": "Paris", "latitude": 48.85, "longitude": 2.35}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = ctx
        .server
        .get("/v1/weather?location=Paris&hour=5&metrics=humidity")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["humidity"], 55.0);
    assert!(body.get("temperature").is_none());
    assert!(body.get("wind_speed").is_none());
}

#[tokio::test]
async fn weather_geocodes_an_unregistered_place() {
    let ctx = test_context();

    let response = ctx.server.get("/v1/weather?location=paris&hour=14").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["location"], "Paris");
    assert_eq!(ctx.provider.geocode_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.provider.fetch_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn weather_rejects_an_out_of_range_hour() {
    let ctx = test_context();

    let response = ctx.server.get("/v1/weather?location=Paris&hour=24").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weather_rejects_an_unknown_metric() {
    let ctx = test_context();

    let response = ctx
        .server
        .get("/v1/weather?location=Paris&hour=14&metrics=visibility")
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn weather_answers_not_found_for_unknown_places() {
    let ctx = test_context_with(StubProvider::unknown_places());

    let response = ctx.server.get("/v1/weather?location=Xyzzy&hour=14").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn weather_treats_an_empty_metrics_list_as_the_default() {
    let ctx = test_context();

    let response = ctx
        .server
        .get("/v1/weather?location=Paris&hour=14&metrics=")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("temperature").is_some());
    assert!(body.get("wind_speed").is_some());
    assert!(body.get("pressure").is_some());
}

// ============ Current Weather Tests ============

#[tokio::test]
async fn current_weather_is_anonymous_and_untracked() {
    let ctx = test_context();

    let response = ctx
        .server
        .get("/v1/weather/current?latitude=48.85&longitude=2.35")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.get("location").is_none());
    assert_eq!(body["latitude"], 48.85);
    assert_eq!(ctx.provider.fetch_calls.load(Ordering::SeqCst), 1);

    // Nothing was registered along the way
    let list: serde_json::Value = ctx.server.get("/v1/locations").await.json();
    assert_eq!(list.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn current_weather_rejects_invalid_coordinates() {
    let ctx = test_context();

    let response = ctx
        .server
        .get("/v1/weather/current?latitude=123.0&longitude=2.35")
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_timeout_maps_to_request_timeout() {
    let ctx = test_context_with(StubProvider::failing_with(UpstreamError::Timeout));

    let response = ctx
        .server
        .get("/v1/weather/current?latitude=48.85&longitude=2.35")
        .await;
    response.assert_status(axum::http::StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn upstream_rejection_keeps_its_status() {
    let ctx = test_context_with(StubProvider::failing_with(UpstreamError::Rejected {
        status: 429,
    }));

    let response = ctx
        .server
        .get("/v1/weather/current?latitude=48.85&longitude=2.35")
        .await;
    response.assert_status(axum::http::StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn upstream_connection_failure_maps_to_service_unavailable() {
    let ctx = test_context_with(StubProvider::failing_with(UpstreamError::ConnectionFailure(
        "connection refused".to_string(),
    )));

    let response = ctx
        .server
        .get("/v1/weather/current?latitude=48.85&longitude=2.35")
        .await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

// ============ Documentation Tests ============

#[tokio::test]
async fn openapi_document_is_served() {
    let ctx = test_context();

    let response = ctx.server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(
        body["info"]["title"]
            .as_str()
            .expect("title present")
            .contains("Stratus")
    );
}

#[tokio::test]
async fn redoc_viewer_is_served() {
    let ctx = test_context();

    let response = ctx.server.get("/redoc").await;
    response.assert_status_ok();
    assert!(response.text().contains("api-docs/openapi.json"));
}
