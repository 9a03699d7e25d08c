use crate::batch::BatchPipeline;
use crate::config::Config;
use crate::errors::AppError;
use crate::geocode_client::{GeocodeRequest, Geocoder};
use crate::models::{AddressInput, EnrichedRecord, GeocodeResult};
use crate::validation::validate_address;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, loaded once at startup.
    pub config: Config,
    /// Geocoding provider used by both geocoding endpoints.
    pub geocoder: Arc<dyn Geocoder>,
}

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-geocode-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /geocode?alamat=&daerah=&negeri=
///
/// Geocodes a single address.
///
/// # Returns
///
/// * `200` - `{formatted_address, latitude, longitude, url}`
/// * `400` - API key not configured, malformed query string, or the address failed validation
/// * `404` - provider found no match
/// * `500` - provider error, with the provider's message
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AddressInput>, QueryRejection>,
) -> Result<Json<GeocodeResult>, AppError> {
    // Key check comes before any look at the query string
    let api_key = state.config.require_api_key()?;
    let Query(params) = query?;

    let record = validate_address(&params)?;
    let address = record.full_address();
    tracing::info!("GET /geocode - address: {}", address);

    let request = GeocodeRequest {
        address: &address,
        region: &state.config.geocode_region,
        api_key,
    };

    let result = state
        .geocoder
        .geocode(&request)
        .await?
        .ok_or_else(|| AppError::NotFound("No results".to_string()))?;

    tracing::info!(
        "Geocoded '{}' -> {} ({}, {}) {}",
        address,
        result.formatted_address,
        result.latitude,
        result.longitude,
        result.map_url
    );

    Ok(Json(result))
}

/// GET /processcsv
///
/// Geocodes every row of the configured input CSV, writes the augmented CSV
/// and returns all records, including the ones that could not be geocoded.
///
/// Provider calls are sequential with `config.batch_delay` between them, so
/// this request takes at least `(rows - 1) * delay`.
pub async fn process_csv(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EnrichedRecord>>, AppError> {
    let api_key = state.config.require_api_key()?;
    tracing::info!(
        "GET /processcsv - input: {}",
        state.config.batch_input_path.display()
    );

    let pipeline = BatchPipeline {
        geocoder: state.geocoder.as_ref(),
        api_key,
        region: &state.config.geocode_region,
        delay: state.config.batch_delay,
    };

    let records = pipeline
        .run(
            &state.config.batch_input_path,
            &state.config.batch_output_path,
        )
        .await?;

    Ok(Json(records))
}
