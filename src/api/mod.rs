//! API Module
//!
//! HTTP handlers and routing for the weather proxy REST API.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
