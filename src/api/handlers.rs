//! API Handlers
//!
//! HTTP request handlers. Each one extracts the location and query, calls the
//! lookup pipeline, and lets [`WeatherError`] pick the status code.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{self, CacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::models::{FlushResponse, ForecastQuery, HealthResponse, StatsResponse};
use crate::weather::{CurrentView, ForecastView, LookupParams, WeatherService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The lookup pipeline, which owns the cache handle
    pub service: Arc<WeatherService>,
}

impl AppState {
    /// Creates a new AppState around an existing pipeline.
    pub fn new(service: WeatherService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds a fresh cache store and the reqwest upstream; fails when the
    /// API key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = cache::shared(CacheStore::new(config.cache_ttl));
        let service = WeatherService::from_config(config, cache)?;
        Ok(Self::new(service))
    }
}

/// Query extraction that surfaces malformed query strings as [`WeatherError`](crate::WeatherError).
type LookupQuery<T> = std::result::Result<Query<T>, QueryRejection>;

/// Handler for GET /weather/:location
///
/// Returns the full upstream record.
pub async fn weather_handler(
    State(state): State<AppState>,
    Path(location): Path<String>,
    query: LookupQuery<LookupParams>,
) -> Result<Json<Value>> {
    let Query(params) = query?;
    let record = state.service.fetch(&location, &params).await?;
    Ok(Json(record))
}

/// Handler for GET /weather/:location/current
pub async fn current_handler(
    State(state): State<AppState>,
    Path(location): Path<String>,
    query: LookupQuery<LookupParams>,
) -> Result<Json<CurrentView>> {
    let Query(params) = query?;
    let view = state.service.current(&location, &params).await?;
    Ok(Json(view))
}

/// Handler for GET /weather/:location/forecast
///
/// `days` truncates the forecast when it is a positive integer.
pub async fn forecast_handler(
    State(state): State<AppState>,
    Path(location): Path<String>,
    query: LookupQuery<ForecastQuery>,
) -> Result<Json<ForecastView>> {
    let Query(query) = query?;
    let view = state
        .service
        .forecast(&location, &query.params, query.days.as_deref())
        .await?;
    Ok(Json(view))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.service.stats().await))
}

/// Handler for DELETE /cache
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    state.service.flush().await;
    Json(FlushResponse::flushed())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
