use crate::models::{GeocodeResult, GoogleGeocodeResponse};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// A single lookup: free-text address plus region bias, authenticated by `api_key`.
#[derive(Debug, Clone, Copy)]
pub struct GeocodeRequest<'a> {
    pub address: &'a str,
    pub region: &'a str,
    pub api_key: &'a str,
}

/// Failure reported by the geocoding provider or while talking to it.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeError {
    /// Could not reach the provider (DNS, connect, timeout, ...).
    Request(String),
    /// Non-2xx HTTP answer.
    Http { status: u16, body: String },
    /// Provider answered with a non-OK status, e.g. `REQUEST_DENIED`.
    Provider { status: String, message: String },
    /// Body could not be decoded.
    Decode(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Request(msg) => write!(f, "Geocoding request failed: {}", msg),
            GeocodeError::Http { status, body } => {
                write!(f, "Geocoding provider returned {}: {}", status, body)
            }
            GeocodeError::Provider { message, .. } => write!(f, "{}", message),
            GeocodeError::Decode(msg) => {
                write!(f, "Failed to parse geocoding response: {}", msg)
            }
        }
    }
}

impl std::error::Error for GeocodeError {}

/// Resolves a free-text address to its best-ranked match.
///
/// `Ok(None)` means the provider answered but had no candidate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(
        &self,
        request: &GeocodeRequest<'_>,
    ) -> Result<Option<GeocodeResult>, GeocodeError>;
}

/// Google Maps search link for a coordinate pair.
///
/// Uses `f64` display formatting, so `1.0` is written as `1`.
pub fn map_url(latitude: f64, longitude: f64) -> String {
    format!("{}{},{}", MAPS_SEARCH_URL, latitude, longitude)
}

/// Client for the Google Geocoding API.
#[derive(Clone)]
pub struct GoogleGeocodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleGeocodeClient {
    /// Creates a new `GoogleGeocodeClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme and host of the API, e.g. `https://maps.googleapis.com`.
    pub fn new(base_url: String) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                GeocodeError::Request(format!("Failed to create geocoding client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/maps/api/geocode/json",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Geocoder for GoogleGeocodeClient {
    async fn geocode(
        &self,
        request: &GeocodeRequest<'_>,
    ) -> Result<Option<GeocodeResult>, GeocodeError> {
        let url = self.endpoint();
        // Redact key from logs to prevent credential exposure
        tracing::debug!(
            "Geocode URL: {}?address={}&region={}&key=[REDACTED]",
            url,
            request.address,
            request.region
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("address", request.address),
                ("region", request.region),
                ("key", request.api_key),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GeocodeError::Http {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let data: GoogleGeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.without_url().to_string()))?;

        if data.status != "OK" && data.status != "ZERO_RESULTS" {
            let message = data
                .error_message
                .unwrap_or_else(|| data.status.clone());
            return Err(GeocodeError::Provider {
                status: data.status,
                message,
            });
        }

        // Always take the best-ranked candidate
        let Some(candidate) = data.results.into_iter().next() else {
            return Ok(None);
        };

        let location = candidate.geometry.location;
        Ok(Some(GeocodeResult {
            formatted_address: candidate.formatted_address,
            latitude: location.lat,
            longitude: location.lng,
            map_url: map_url(location.lat, location.lng),
        }))
    }
}
