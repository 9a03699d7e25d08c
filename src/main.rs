use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_geocode_api::build_router;
use rust_geocode_api::config::Config;
use rust_geocode_api::geocode_client::GoogleGeocodeClient;
use rust_geocode_api::handlers::AppState;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Geocoding provider client.
/// - HTTP routes and middleware (CORS, tracing, body limit).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_geocode_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let geocoder = GoogleGeocodeClient::new(config.geocode_base_url.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding client: {}", e))?;
    tracing::info!("✓ Geocoding client initialized: {}", config.geocode_base_url);

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        geocoder: Arc::new(geocoder),
    });

    let app = build_router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server started at http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
