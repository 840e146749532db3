//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired entries and logs cache statistics

mod sweep;

pub use sweep::SweepTask;
