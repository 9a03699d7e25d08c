//! Shared test helpers: a scripted `Geocoder` stub and config builders.
#![allow(dead_code)]

use async_trait::async_trait;
use rust_geocode_api::config::Config;
use rust_geocode_api::geocode_client::{map_url, GeocodeError, GeocodeRequest, Geocoder};
use rust_geocode_api::models::GeocodeResult;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// What the stub answers for one call.
#[derive(Debug, Clone)]
pub enum StubReply {
    Found(GeocodeResult),
    NoMatch,
    Fail(String),
}

pub fn found(formatted_address: &str, latitude: f64, longitude: f64) -> StubReply {
    StubReply::Found(GeocodeResult {
        formatted_address: formatted_address.to_string(),
        latitude,
        longitude,
        map_url: map_url(latitude, longitude),
    })
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub address: String,
    pub region: String,
    pub api_key: String,
    pub at: Instant,
}

/// Answers calls in order from a script; answers "no match" once the script runs out.
#[derive(Default)]
pub struct StubGeocoder {
    replies: Mutex<VecDeque<StubReply>>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubGeocoder {
    pub fn new(replies: Vec<StubReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(
        &self,
        request: &GeocodeRequest<'_>,
    ) -> Result<Option<GeocodeResult>, GeocodeError> {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        self.calls.lock().unwrap().push(RecordedCall {
            address: request.address.to_string(),
            region: request.region.to_string(),
            api_key: request.api_key.to_string(),
            at: Instant::now(),
        });

        // Give any concurrent caller a chance to overlap
        tokio::task::yield_now().await;

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StubReply::NoMatch);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            StubReply::Found(result) => Ok(Some(result)),
            StubReply::NoMatch => Ok(None),
            StubReply::Fail(message) => Err(GeocodeError::Provider {
                status: "REQUEST_DENIED".to_string(),
                message,
            }),
        }
    }
}

/// Config with an API key, batch files under `dir`, and no batch delay.
pub fn test_config(dir: &Path) -> Config {
    Config {
        geocode_api_key: Some("test_key".to_string()),
        batch_input_path: dir.join("penempatan.csv"),
        batch_output_path: dir.join("penempatan-geocoded.csv"),
        batch_delay: Duration::ZERO,
        ..Config::default()
    }
}
