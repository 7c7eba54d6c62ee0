//! Stratus HTTP Server
//!
//! Main entry point for the weather cache API server.

use std::{sync::Arc, time::Duration};

use application::{
    RefreshScheduler, RefreshService, WeatherService,
    ports::{LocationStore, ObservationStore, WeatherProviderPort},
};
use infrastructure::{
    AppConfig, OpenMeteoProvider, SqliteLocationStore, SqliteObservationStore, create_pool,
};
use presentation_http::{routes, set_expose_internal_errors, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first; the log format depends on it. Errors are
    // reported once tracing is up.
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize tracing
    let fmt_layer = if config.server.log_format == "json" {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stratus_server=debug,tower_http=debug".into()),
        )
        .with(fmt_layer)
        .init();

    info!("🌤  Stratus v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.path,
        "Configuration loaded"
    );

    set_expose_internal_errors(config.server.expose_internal_errors);

    // Initialize persistence
    let pool = Arc::new(create_pool(&config.database)?);
    let locations: Arc<dyn LocationStore> =
        Arc::new(SqliteLocationStore::new(Arc::clone(&pool)));
    let observations: Arc<dyn ObservationStore> =
        Arc::new(SqliteObservationStore::new(Arc::clone(&pool)));

    // Initialize the upstream weather provider
    let provider: Arc<dyn WeatherProviderPort> = Arc::new(OpenMeteoProvider::with_config(
        config.upstream.to_client_config(),
        config.retry.to_retry_config(),
    )?);

    // Initialize services
    let weather_service = WeatherService::new(
        Arc::clone(&provider),
        Arc::clone(&locations),
        Arc::clone(&observations),
    );

    let refresh_config = config.refresh.to_refresh_config();
    let refresh_service = Arc::new(RefreshService::new(
        provider,
        locations,
        observations,
        refresh_config.max_concurrency,
    ));
    let scheduler = RefreshScheduler::new(refresh_service, refresh_config.interval);

    if config.refresh.enabled {
        scheduler.start();
        info!(
            interval_secs = config.refresh.interval_secs,
            "Background refresh scheduler started"
        );
    }

    // Create app state
    let state = AppState {
        weather_service: Arc::new(weather_service),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production mode: restrict to configured origins
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any)
    };

    // Add middleware (order matters: first added = outermost)
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size_json_bytes));

    let app = if config.server.cors_enabled {
        app.layer(cors_layer)
    } else {
        app
    };

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{}", addr);
    info!("📚 API docs: http://{}/redoc", addr);

    // Graceful shutdown configuration
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    // Stop the refresh loop so a mid-cycle fetch finishes or cancels cleanly
    scheduler.stop().await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

/// Resolve once SIGINT or SIGTERM arrives
///
/// A handler that cannot be installed is logged and parked, so the other
/// signal still works.
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("📥 Ctrl+C received, shutting down..."),
        () = terminate => info!("📥 SIGTERM received, shutting down..."),
    }

    // axum drains in-flight connections after this future resolves
    info!("⏳ Draining connections for up to {:?}...", timeout);
}
