//! Integration tests for the Open-Meteo clients using wiremock
//!
//! These tests verify forecast and geocoding behavior against a mock HTTP
//! server, covering success, upstream failure, and malformed payloads.

use integration_weather::{
    ForecastClient, GeocodingClient, HOURLY_SERIES, OpenMeteoClient, OpenMeteoConfig,
    OpenMeteoGeocoder, WeatherError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use domain::GeoLocation;

/// Sample forecast response with a full day of hourly samples
fn sample_forecast_response() -> serde_json::Value {
    let time: Vec<String> = (0..24).map(|h| format!("2026-08-25T{h:02}:00")).collect();
    serde_json::json!({
        "latitude": 48.86,
        "longitude": 2.34,
        "generationtime_ms": 0.21,
        "utc_offset_seconds": 7200,
        "timezone": "Europe/Paris",
        "timezone_abbreviation": "CEST",
        "elevation": 43.0,
        "hourly_units": {
            "time": "iso8601",
            "temperature_2m": "°C",
            "pressure_msl": "hPa",
            "precipitation": "mm",
            "relative_humidity_2m": "%",
            "wind_speed_10m": "km/h",
            "wind_direction_10m": "°"
        },
        "hourly": {
            "time": time,
            "temperature_2m": [
                9.8, 9.4, 9.1, 8.9, 8.7, 8.9, 9.6, 10.4, 11.2, 11.9, 12.6, 13.1,
                13.0, 12.7, 12.3, 12.8, 13.4, 13.9, 13.6, 12.9, 12.1, 11.4, 10.8, 10.2
            ],
            "pressure_msl": [
                1013.2, 1013.0, 1012.8, 1012.7, 1012.9, 1013.1, 1013.4, 1013.8, 1014.1,
                1014.3, 1014.2, 1014.0, 1013.7, 1013.5, 1013.6, 1013.9, 1014.2, 1014.5,
                1014.8, 1015.0, 1015.1, 1015.0, 1014.8, 1014.6
            ],
            "precipitation": [
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.2, 0.4,
                0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0
            ],
            "relative_humidity_2m": [
                82, 84, 85, 86, 87, 86, 83, 79, 74, 70, 67, 64,
                63, 64, 66, 65, 62, 60, 62, 66, 71, 75, 78, 80
            ],
            "wind_speed_10m": [
                11.2, 10.8, 10.1, 9.7, 9.4, 9.9, 10.6, 11.8, 13.0, 14.1, 15.2, 15.8,
                16.0, 15.7, 15.1, 14.6, 13.8, 13.1, 12.4, 11.9, 11.5, 11.3, 11.0, 10.9
            ],
            "wind_direction_10m": [
                200, 202, 205, 207, 210, 212, 215, 218, 220, 223, 225, 228,
                230, 228, 226, 224, 221, 219, 217, 214, 211, 208, 205, 203
            ]
        }
    })
}

/// Sample geocoding response for Paris
fn sample_geocoding_response() -> serde_json::Value {
    serde_json::json!({
        "results": [
            {
                "id": 2_988_507,
                "name": "Paris",
                "latitude": 48.85341,
                "longitude": 2.3488,
                "elevation": 42.0,
                "feature_code": "PPLC",
                "country_code": "FR",
                "country": "France",
                "timezone": "Europe/Paris",
                "population": 2_138_551
            }
        ],
        "generationtime_ms": 0.65
    })
}

/// Create a forecast client configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_client(mock_server: &MockServer) -> OpenMeteoClient {
    #[allow(clippy::expect_used)]
    OpenMeteoClient::new(OpenMeteoConfig::for_testing(&mock_server.uri()))
        .expect("Failed to create client")
}

/// Create a geocoding client configured to use the mock server
///
/// # Panics
///
/// Panics if the client cannot be created (should not happen in tests).
fn create_test_geocoder(mock_server: &MockServer) -> OpenMeteoGeocoder {
    #[allow(clippy::expect_used)]
    OpenMeteoGeocoder::new(OpenMeteoConfig::for_testing(&mock_server.uri()))
        .expect("Failed to create geocoder")
}

/// Setup a mock for the /v1/forecast endpoint with the given response
async fn setup_forecast_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

/// Setup a mock for the /v1/search endpoint with the given response
async fn setup_geocoding_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

fn paris() -> GeoLocation {
    #[allow(clippy::expect_used)]
    GeoLocation::new(48.85, 2.35).expect("valid coordinates")
}

// ============================================================================
// Forecast success scenarios
// ============================================================================

#[tokio::test]
async fn test_fetch_hourly_success() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(&paris()).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");

    let hourly = result.unwrap();
    assert_eq!(hourly.temperature_2m.len(), 24);
    assert!((hourly.temperature_2m[14] - 12.3).abs() < f64::EPSILON);
    assert!((hourly.relative_humidity_2m[5] - 86.0).abs() < f64::EPSILON);
    assert!((hourly.precipitation[11] - 0.4).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_fetch_hourly_preserves_unprojected_series() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_forecast_response()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let hourly = client.fetch_hourly(&paris()).await.unwrap();

    // Series outside the projection set survive in the payload untouched
    assert!(hourly.extra.contains_key("wind_direction_10m"));
    assert!(hourly.extra.contains_key("time"));
}

#[tokio::test]
async fn test_fetch_hourly_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .and(query_param("hourly", HOURLY_SERIES))
        .and(query_param("forecast_days", "1"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(&paris()).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

// ============================================================================
// Forecast error scenarios
// ============================================================================

#[tokio::test]
async fn test_server_error_carries_status() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(&paris()).await;

    assert!(
        matches!(result, Err(WeatherError::RequestFailed { status: 500 })),
        "Expected RequestFailed with status 500, got: {result:?}"
    );
}

#[tokio::test]
async fn test_client_error_carries_status() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(404).set_body_string("Not Found"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(&paris()).await;

    assert!(
        matches!(result, Err(WeatherError::RequestFailed { status: 404 })),
        "Expected RequestFailed with status 404, got: {result:?}"
    );
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("not valid json"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(&paris()).await;

    assert!(
        matches!(result, Err(WeatherError::ParseError(_))),
        "Expected ParseError, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_hourly_block_is_parse_error() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"latitude": 48.86, "longitude": 2.34})),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_hourly(&paris()).await;

    assert!(
        matches!(result, Err(WeatherError::ParseError(_))),
        "Expected ParseError, got: {result:?}"
    );
}

#[tokio::test]
async fn test_slow_response_is_timeout() {
    let mock_server = MockServer::start().await;

    setup_forecast_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_forecast_response())
            .set_delay(std::time::Duration::from_secs(3)),
    )
    .await;

    let config = OpenMeteoConfig {
        timeout_secs: 1,
        ..OpenMeteoConfig::for_testing(&mock_server.uri())
    };
    #[allow(clippy::expect_used)]
    let client = OpenMeteoClient::new(config).expect("Failed to create client");
    let result = client.fetch_hourly(&paris()).await;

    assert!(
        matches!(result, Err(WeatherError::Timeout)),
        "Expected Timeout, got: {result:?}"
    );
}

// ============================================================================
// Geocoding scenarios
// ============================================================================

#[tokio::test]
async fn test_geocode_success() {
    let mock_server = MockServer::start().await;

    setup_geocoding_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_geocoding_response()),
    )
    .await;

    let geocoder = create_test_geocoder(&mock_server);
    let result = geocoder.geocode("Paris").await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");

    let coordinates = result.unwrap();
    assert!((coordinates.latitude() - 48.85341).abs() < 1e-6);
    assert!((coordinates.longitude() - 2.3488).abs() < 1e-6);
}

#[tokio::test]
async fn test_geocode_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_geocoding_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geocoder = create_test_geocoder(&mock_server);
    let result = geocoder.geocode("  Paris  ").await;

    assert!(
        result.is_ok(),
        "Expected trimmed lookup to succeed, got: {result:?}"
    );
}

#[tokio::test]
async fn test_geocode_empty_results_is_place_not_found() {
    let mock_server = MockServer::start().await;

    setup_geocoding_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({"results": [], "generationtime_ms": 0.5})),
    )
    .await;

    let geocoder = create_test_geocoder(&mock_server);
    let result = geocoder.geocode("Atlantis").await;

    assert!(
        matches!(result, Err(WeatherError::PlaceNotFound(ref name)) if name == "Atlantis"),
        "Expected PlaceNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_geocode_missing_results_key_is_place_not_found() {
    let mock_server = MockServer::start().await;

    setup_geocoding_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"generationtime_ms": 0.4})),
    )
    .await;

    let geocoder = create_test_geocoder(&mock_server);
    let result = geocoder.geocode("Nowhere").await;

    assert!(
        matches!(result, Err(WeatherError::PlaceNotFound(_))),
        "Expected PlaceNotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_geocode_server_error_carries_status() {
    let mock_server = MockServer::start().await;

    setup_geocoding_mock(
        &mock_server,
        ResponseTemplate::new(503).set_body_string("Service Unavailable"),
    )
    .await;

    let geocoder = create_test_geocoder(&mock_server);
    let result = geocoder.geocode("Paris").await;

    assert!(
        matches!(result, Err(WeatherError::RequestFailed { status: 503 })),
        "Expected RequestFailed with status 503, got: {result:?}"
    );
}
