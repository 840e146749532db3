//! Cache-aside lookup pipeline.
//!
//! `fetch` reads through the shared store: a live entry is returned as is,
//! otherwise the upstream provider is called and a successful body is stored
//! before it is returned. Failures are classified and never cached.
//!
//! Concurrent misses for the same key take turns on a per-key gate; whoever
//! waited re-checks the store first, so one upstream call serves them all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, SharedCache};
use crate::config::Config;
use crate::error::{Result, WeatherError};
use crate::weather::{
    classify, current_view, forecast_view, CacheKey, CurrentView, ForecastView, HttpUpstream,
    LookupParams, UpstreamProvider, UpstreamRequest,
};

type Gate = Arc<tokio::sync::Mutex<()>>;
type GateMap = Mutex<HashMap<CacheKey, Gate>>;

// == Weather Service ==
/// The lookup pipeline shared by the HTTP and console front ends.
pub struct WeatherService {
    cache: SharedCache,
    upstream: Arc<dyn UpstreamProvider>,
    /// TTL in seconds for successful lookups
    cache_ttl: u64,
    in_flight: GateMap,
}

impl WeatherService {
    // == Constructor ==
    pub fn new(cache: SharedCache, upstream: Arc<dyn UpstreamProvider>, cache_ttl: u64) -> Self {
        Self {
            cache,
            upstream,
            cache_ttl,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Builds the pipeline with the reqwest upstream described by `config`.
    pub fn from_config(config: &Config, cache: SharedCache) -> Result<Self> {
        let upstream = HttpUpstream::from_config(config)?;
        Ok(Self::new(cache, Arc::new(upstream), config.cache_ttl))
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Fetch ==
    /// Returns the full weather record for `location`.
    pub async fn fetch(&self, location: &str, params: &LookupParams) -> Result<Value> {
        let location = location.trim();
        if location.is_empty() {
            return Err(WeatherError::InvalidArgument("location required".to_string()));
        }
        params.validate()?;

        let key = CacheKey::derive(location, params);

        let cached = self.cache.write().await.get(key.as_str());
        if let Some(value) = cached {
            debug!(%key, "cache hit");
            return Ok(value);
        }
        debug!(%key, "cache miss");

        let flight = InFlight::join(&self.in_flight, &key);
        let _turn = flight.gate.lock().await;

        let filled = self.cache.read().await.peek(key.as_str());
        if let Some(value) = filled {
            debug!(%key, "filled by concurrent lookup");
            return Ok(value);
        }

        self.fetch_upstream(location, params, &key).await
    }

    async fn fetch_upstream(
        &self,
        location: &str,
        params: &LookupParams,
        key: &CacheKey,
    ) -> Result<Value> {
        let request = UpstreamRequest {
            location: location.to_string(),
            params: params.with_default_unit_group(),
        };

        let response = self.upstream.fetch(&request).await.map_err(|failure| {
            let err = classify(failure);
            warn!(%key, kind = err.kind(), error = %err, "upstream lookup failed");
            err
        })?;

        if !response.is_success() {
            let message = match &response.body {
                Value::String(text) if !text.trim().is_empty() => text.trim().to_string(),
                _ => format!("unexpected upstream status {}", response.status),
            };
            warn!(%key, status = response.status, "upstream answered without success");
            return Err(WeatherError::UpstreamError {
                status: response.status,
                message,
            });
        }

        self.cache.write().await.set(
            key.to_string(),
            response.body.clone(),
            Some(self.cache_ttl),
        )?;
        info!(%key, ttl = self.cache_ttl, "cached upstream record");

        Ok(response.body)
    }

    // == Views ==
    /// Current conditions for `location`, read through the cache.
    pub async fn current(&self, location: &str, params: &LookupParams) -> Result<CurrentView> {
        let record = self.fetch(location, params).await?;
        Ok(current_view(&record))
    }

    /// Daily forecast for `location`, truncated to `days` when that is a positive integer.
    pub async fn forecast(
        &self,
        location: &str,
        params: &LookupParams,
        days: Option<&str>,
    ) -> Result<ForecastView> {
        let record = self.fetch(location, params).await?;
        Ok(forecast_view(&record, days))
    }

    // == Cache Administration ==
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    pub async fn flush(&self) {
        self.cache.write().await.flush();
        info!("weather cache flushed");
    }
}

// == In-Flight Gate ==
/// Membership in the set of lookups currently missing on one key.
///
/// Dropping the last member removes the key's gate, including when the
/// lookup future is cancelled mid-flight.
struct InFlight<'a> {
    map: &'a GateMap,
    key: CacheKey,
    gate: Gate,
}

impl<'a> InFlight<'a> {
    fn join(map: &'a GateMap, key: &CacheKey) -> Self {
        let gate = map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default()
            .clone();

        Self {
            map,
            key: key.clone(),
            gate,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        let last = map
            .get(&self.key)
            .is_some_and(|gate| Arc::ptr_eq(gate, &self.gate) && Arc::strong_count(gate) == 2);
        if last {
            map.remove(&self.key);
        }
    }
}
