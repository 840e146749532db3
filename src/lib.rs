//! Weather Proxy - A read-through caching proxy for an upstream weather API
//!
//! Lookups are served from a TTL cache when possible; misses go upstream and
//! successful records are cached. Upstream failures surface as typed errors.

pub mod api;
pub mod cache;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod tasks;
pub mod weather;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, WeatherError};
pub use tasks::SweepTask;
pub use weather::{LookupParams, WeatherService};

/// Installs the fmt subscriber used by both binaries.
///
/// Defaults to `default_filter`, overridable with `RUST_LOG`.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
