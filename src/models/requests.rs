//! Request DTOs for the weather proxy API
//!
//! Query strings are deserialized straight into these.

use serde::Deserialize;

use crate::weather::LookupParams;

/// Query for `GET /weather/:location/forecast`
///
/// # Fields
/// - `days`: how many leading days to keep; kept as text because a
///   non-numeric value means "all days", not a rejected request
/// - the remaining fields are the usual lookup parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastQuery {
    #[serde(default)]
    pub days: Option<String>,
    #[serde(flatten)]
    pub params: LookupParams,
}
