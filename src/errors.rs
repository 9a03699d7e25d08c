use crate::geocode_client::GeocodeError;
use crate::validation::{RowError, ValidationError};
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Public message for any failure while reading or writing the batch files.
pub const FILE_ERROR_MESSAGE: &str = "An error occurred while processing the CSV file";

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// `GEOCODE_API_KEY` is not configured.
    MissingApiKey,
    /// An address failed validation.
    Validation(ValidationError),
    /// One or more rows of the batch input failed validation.
    InvalidRecords(Vec<RowError>),
    /// The provider returned no candidates.
    NotFound(String),
    /// Network, auth or quota failure reported by the geocoding provider.
    ProviderError(String),
    /// Batch input could not be read/parsed, or output could not be written.
    FileError(String),
    /// Query string could not be decoded into the expected parameters.
    BadRequest(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingApiKey => write!(f, "API key not found"),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::InvalidRecords(errors) => match errors.first() {
                Some(first) => write!(f, "Invalid record: {}", first.error),
                None => write!(f, "Invalid record"),
            },
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ProviderError(msg) => write!(f, "Geocoding provider error: {}", msg),
            AppError::FileError(msg) => write!(f, "File error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Maps each variant to its status code and a `{"message": ...}` body.
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingApiKey => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::InvalidRecords(errors) => {
                tracing::warn!("Batch input rejected: {} invalid row(s)", errors.len());
                let body = Json(json!({
                    "message": self.to_string(),
                    "errors": errors,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ProviderError(msg) => {
                tracing::error!("Geocoding provider error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::FileError(msg) => {
                tracing::error!("CSV file error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FILE_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return (**source).clone().into_response();
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<GeocodeError> for AppError {
    fn from(err: GeocodeError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::FileError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileError(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e.into()),
            context: f(),
        })
    }
}
