//! Weather Module
//!
//! The cache-aside lookup pipeline and everything it talks to: key
//! derivation, the upstream provider seam with its error classification, the
//! reqwest client, and the projections served by the front ends.

mod client;
mod params;
mod service;
mod upstream;
mod views;

pub use client::HttpUpstream;
pub use params::{CacheKey, LookupParams, DEFAULT_UNIT_GROUP, PARAM_NAMES};
pub use service::WeatherService;
pub use upstream::{classify, UpstreamFailure, UpstreamProvider, UpstreamRequest, UpstreamResponse};
pub use views::{current_view, forecast_view, truncate_days, Coordinates, CurrentView, ForecastView};
