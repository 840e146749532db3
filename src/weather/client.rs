//! HTTP upstream provider.
//!
//! Talks to a Visual Crossing style timeline endpoint:
//! `GET <base>/<location>?key=..&unitGroup=..`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{validate_api_key, Config};
use crate::error::{Result, WeatherError};
use crate::weather::{UpstreamFailure, UpstreamProvider, UpstreamRequest, UpstreamResponse};

/// reqwest-backed [`UpstreamProvider`].
#[derive(Clone)]
pub struct HttpUpstream {
    api_key: String,
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpUpstream {
    /// Creates a client, failing fast on a blank key or unusable base URL.
    ///
    /// `timeout` bounds the whole request, connect through body.
    pub fn new(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;

        let base_url = Url::parse(base_url).map_err(|e| {
            WeatherError::ConfigurationError(format!("invalid upstream base URL: {}", e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(WeatherError::ConfigurationError(format!(
                "upstream base URL cannot carry a path: {}",
                base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url,
            http_client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_key.clone(),
            &config.base_url,
            Duration::from_secs(config.upstream_timeout),
        )
    }

    /// Base URL with the location appended as one percent-encoded path segment.
    pub fn endpoint(&self, location: &str) -> std::result::Result<Url, UpstreamFailure> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                UpstreamFailure::InvalidRequest("upstream base URL cannot carry a path".into())
            })?
            .pop_if_empty()
            .push(location);
        Ok(url)
    }
}

#[async_trait]
impl UpstreamProvider for HttpUpstream {
    #[instrument(skip(self, request), fields(location = %request.location))]
    async fn fetch(
        &self,
        request: &UpstreamRequest,
    ) -> std::result::Result<UpstreamResponse, UpstreamFailure> {
        let url = self.endpoint(&request.location)?;

        let mut query = vec![("key", self.api_key.as_str())];
        query.extend(request.params.entries());

        let response = self
            .http_client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match text.trim() {
                "" => status
                    .canonical_reason()
                    .unwrap_or("upstream error")
                    .to_string(),
                text => text.to_string(),
            };
            warn!(status = status.as_u16(), %message, "upstream returned error status");
            return Err(UpstreamFailure::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamFailure::NoResponse(e.without_url().to_string())
            } else {
                UpstreamFailure::Status {
                    status: status.as_u16(),
                    message: format!("invalid response body: {}", e.without_url()),
                }
            }
        })?;

        debug!(status = status.as_u16(), "upstream lookup succeeded");
        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Splits send errors into "never left" and "left but nothing came back".
///
/// The URL is stripped because its query carries the API key.
fn transport_failure(err: reqwest::Error) -> UpstreamFailure {
    let err = err.without_url();
    if err.is_builder() {
        UpstreamFailure::InvalidRequest(err.to_string())
    } else {
        warn!(error = %err, "upstream request failed without response");
        UpstreamFailure::NoResponse(err.to_string())
    }
}
