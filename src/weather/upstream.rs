//! Upstream provider seam.
//!
//! Providers report what happened on the wire as an [`UpstreamFailure`];
//! [`classify`] is the one place those raw signals become domain errors.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::WeatherError;
use crate::weather::LookupParams;

// == Upstream Request ==
/// A single lookup as sent upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Trimmed location, not yet URL-encoded
    pub location: String,
    /// Caller params with the unit group already defaulted
    pub params: LookupParams,
}

// == Upstream Response ==
/// A response that made it back from upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// == Upstream Failure ==
/// Raw failure signal from a provider, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// Connection made, response status outside 2xx
    Status { status: u16, message: String },
    /// Request sent but no response received (network error, timeout)
    NoResponse(String),
    /// Request could not be built or sent at all
    InvalidRequest(String),
}

// == Provider Trait ==
/// Source of weather records consulted on a cache miss.
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    async fn fetch(
        &self,
        request: &UpstreamRequest,
    ) -> std::result::Result<UpstreamResponse, UpstreamFailure>;
}

// == Classification ==
/// Maps a raw upstream failure onto the domain error taxonomy.
pub fn classify(failure: UpstreamFailure) -> WeatherError {
    match failure {
        UpstreamFailure::Status { status: 400, message } => WeatherError::InvalidRequest(message),
        UpstreamFailure::Status {
            status: 401 | 403,
            message,
        } => WeatherError::AuthenticationError(message),
        UpstreamFailure::Status { status: 404, message } => {
            WeatherError::LocationNotFound(message)
        }
        UpstreamFailure::Status { status: 429, message } => {
            WeatherError::RateLimitExceeded(message)
        }
        UpstreamFailure::Status { status, message } => {
            WeatherError::UpstreamError { status, message }
        }
        UpstreamFailure::NoResponse(message) => WeatherError::UpstreamUnavailable(message),
        UpstreamFailure::InvalidRequest(message) => WeatherError::ConfigurationError(message),
    }
}
