//! Configuration Module
//!
//! Handles loading and validating proxy configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::MAX_TTL_SECS;
use crate::error::{Result, WeatherError};

/// Default upstream endpoint (Visual Crossing timeline API).
pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Placeholder value shipped in sample env files; treated as a missing key.
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// Baseline cache TTL in seconds (12 hours).
pub const DEFAULT_CACHE_TTL: u64 = 43_200;

/// Proxy configuration parameters.
///
/// Everything except the API key has a sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API key
    pub api_key: String,
    /// Upstream base URL; the location is appended as a path segment
    pub base_url: String,
    /// TTL in seconds for cached weather records
    pub cache_ttl: u64,
    /// Interval in seconds between expiry sweeps
    pub sweep_interval: u64,
    /// Upper bound on a single upstream request, in seconds
    pub upstream_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `WEATHER_API_KEY` - Upstream API key (required)
    /// - `WEATHER_API_BASE_URL` - Upstream base URL (default: Visual Crossing timeline)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 43200)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 20% of `CACHE_TTL`)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Result<Self> {
        let cache_ttl = parse_var("CACHE_TTL").unwrap_or(DEFAULT_CACHE_TTL);

        let config = Self {
            api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            base_url: env::var("WEATHER_API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cache_ttl,
            sweep_interval: parse_var("CACHE_SWEEP_INTERVAL")
                .unwrap_or_else(|| default_sweep_interval(cache_ttl)),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT_SECS").unwrap_or(10),
            server_port: parse_var("SERVER_PORT").unwrap_or(3000),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would make the proxy unusable.
    pub fn validate(&self) -> Result<()> {
        validate_api_key(&self.api_key)?;

        if self.cache_ttl == 0 {
            return Err(WeatherError::ConfigurationError(
                "CACHE_TTL must be a positive number of seconds".to_string(),
            ));
        }
        if self.cache_ttl > MAX_TTL_SECS {
            return Err(WeatherError::ConfigurationError(format!(
                "CACHE_TTL must be at most {} seconds",
                MAX_TTL_SECS
            )));
        }
        if self.sweep_interval == 0 {
            return Err(WeatherError::ConfigurationError(
                "CACHE_SWEEP_INTERVAL must be a positive number of seconds".to_string(),
            ));
        }
        if self.sweep_interval > MAX_TTL_SECS {
            return Err(WeatherError::ConfigurationError(format!(
                "CACHE_SWEEP_INTERVAL must be at most {} seconds",
                MAX_TTL_SECS
            )));
        }
        if self.upstream_timeout == 0 {
            return Err(WeatherError::ConfigurationError(
                "UPSTREAM_TIMEOUT_SECS must be a positive number of seconds".to_string(),
            ));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(WeatherError::ConfigurationError(format!(
                "WEATHER_API_BASE_URL is not a valid URL: {}",
                self.base_url
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            sweep_interval: default_sweep_interval(DEFAULT_CACHE_TTL),
            upstream_timeout: 10,
            server_port: 3000,
        }
    }
}

/// Rejects blank and placeholder API keys.
pub fn validate_api_key(api_key: &str) -> Result<()> {
    let key = api_key.trim();
    if key.is_empty() || key == API_KEY_PLACEHOLDER {
        return Err(WeatherError::ConfigurationError(
            "WEATHER_API_KEY is not set".to_string(),
        ));
    }
    Ok(())
}

/// Sweep every fifth of the TTL, never more often than once a second.
pub fn default_sweep_interval(cache_ttl: u64) -> u64 {
    (cache_ttl / 5).max(1)
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
