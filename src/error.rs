//! Error types for the weather proxy
//!
//! Every failure the core can produce is one of a fixed set of kinds, so
//! adapters map them to transport codes without inspecting message text.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Weather Error Enum ==
/// Unified error type for the weather proxy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// Caller supplied a malformed argument (empty location, zero TTL, half a date range)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream rejected the request as malformed (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream rejected the API key (HTTP 401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Upstream could not resolve the location (HTTP 404)
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Upstream rate limit hit (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Any other non-success upstream status
    #[error("Upstream error ({status}): {message}")]
    UpstreamError { status: u16, message: String },

    /// Request was sent but no response came back (network failure or timeout)
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Request could not be built or sent (missing key, bad base URL)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl WeatherError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::InvalidArgument(_) => "invalid_argument",
            WeatherError::InvalidRequest(_) => "invalid_request",
            WeatherError::AuthenticationError(_) => "authentication_error",
            WeatherError::LocationNotFound(_) => "location_not_found",
            WeatherError::RateLimitExceeded(_) => "rate_limit_exceeded",
            WeatherError::UpstreamError { .. } => "upstream_error",
            WeatherError::UpstreamUnavailable(_) => "upstream_unavailable",
            WeatherError::ConfigurationError(_) => "configuration_error",
        }
    }

    /// HTTP status an adapter should answer with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::InvalidArgument(_) | WeatherError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            WeatherError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            WeatherError::LocationNotFound(_) => StatusCode::NOT_FOUND,
            WeatherError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            WeatherError::UpstreamError { .. } | WeatherError::ConfigurationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WeatherError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

// == Extractor Rejections ==
impl From<QueryRejection> for WeatherError {
    fn from(rejection: QueryRejection) -> Self {
        WeatherError::InvalidArgument(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.kind(), self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the weather proxy.
pub type Result<T> = std::result::Result<T, WeatherError>;
