//! Malaysian Address Geocoding API Library
//!
//! Forwards address lookups to the Google Geocoding API and batch-geocodes
//! the address CSV, writing an augmented CSV with coordinates and map links.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `batch`: CSV batch geocoding pipeline.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `geocode_client`: Geocoding provider client.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `validation`: Address validation rules.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod batch;
pub mod config;
pub mod errors;
pub mod geocode_client;
pub mod handlers;
pub mod models;
pub mod validation;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, map_response_body::MapResponseBodyLayer,
    trace::TraceLayer,
};

use crate::handlers::AppState;

/// Build the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/geocode", get(handlers::geocode))
        .route("/processcsv", get(handlers::process_csv))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                // Erase the limit layer's body type so CorsLayer's `Default` bound holds
                .layer(MapResponseBodyLayer::new(axum::body::Body::new))
                // All routes are GET; nothing legitimate carries a body
                .layer(RequestBodyLimitLayer::new(64 * 1024)),
        )
}
