use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default Google Maps Platform host; override with `GEOCODE_BASE_URL`.
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com";
/// Region bias sent with every lookup (Malaysia).
pub const DEFAULT_GEOCODE_REGION: &str = "my";
pub const DEFAULT_BATCH_INPUT_PATH: &str = "public/penempatan.csv";
pub const DEFAULT_BATCH_OUTPUT_PATH: &str = "public/penempatan-geocoded.csv";
/// Pause between consecutive provider calls in the batch pipeline.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Missing key is not fatal at startup; the geocoding endpoints answer 400 instead.
    pub geocode_api_key: Option<String>,
    pub geocode_base_url: String,
    pub geocode_region: String,
    pub batch_input_path: PathBuf,
    pub batch_output_path: PathBuf,
    pub batch_delay: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            geocode_api_key: std::env::var("GEOCODE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            geocode_base_url: std::env::var("GEOCODE_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|base| -> anyhow::Result<String> {
                    if !base.starts_with("http://") && !base.starts_with("https://") {
                        anyhow::bail!("GEOCODE_BASE_URL must start with http:// or https://");
                    }
                    url::Url::parse(&base).map_err(|e| {
                        anyhow::anyhow!("GEOCODE_BASE_URL is not a valid URL: {}", e)
                    })?;
                    Ok(base.trim_end_matches('/').to_string())
                })
                .transpose()?
                .unwrap_or_else(|| DEFAULT_GEOCODE_BASE_URL.to_string()),
            geocode_region: std::env::var("GEOCODE_REGION")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEOCODE_REGION.to_string()),
            batch_input_path: PathBuf::from(DEFAULT_BATCH_INPUT_PATH),
            batch_output_path: PathBuf::from(DEFAULT_BATCH_OUTPUT_PATH),
            batch_delay: DEFAULT_BATCH_DELAY,
        };

        // Log successful configuration load (without the API key)
        tracing::info!("Configuration loaded successfully");
        if config.geocode_api_key.is_none() {
            tracing::warn!("GEOCODE_API_KEY not set; geocoding endpoints will return 400");
        }
        tracing::debug!("Geocode Base URL: {}", config.geocode_base_url);
        tracing::debug!("Geocode Region: {}", config.geocode_region);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Returns the API key, or the error both geocoding endpoints answer with when it is absent.
    pub fn require_api_key(&self) -> Result<&str, crate::errors::AppError> {
        self.geocode_api_key
            .as_deref()
            .ok_or(crate::errors::AppError::MissingApiKey)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            geocode_api_key: None,
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            geocode_region: DEFAULT_GEOCODE_REGION.to_string(),
            batch_input_path: PathBuf::from(DEFAULT_BATCH_INPUT_PATH),
            batch_output_path: PathBuf::from(DEFAULT_BATCH_OUTPUT_PATH),
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}
