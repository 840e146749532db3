//! API Routes
//!
//! Configures the Axum router with all weather proxy endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    current_handler, flush_handler, forecast_handler, health_handler, stats_handler,
    weather_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /weather/:location` - Full weather record
/// - `GET /weather/:location/current` - Current conditions
/// - `GET /weather/:location/forecast` - Daily forecast, `?days=N` to truncate
/// - `GET /cache/stats` - Cache statistics
/// - `DELETE /cache` - Flush the cache
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/weather/:location", get(weather_handler))
        .route("/weather/:location/current", get(current_handler))
        .route("/weather/:location/forecast", get(forecast_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(flush_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
