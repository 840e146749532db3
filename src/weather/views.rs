//! Projections over a full weather record.
//!
//! The record stays opaque apart from the handful of fields read here.
//! Missing fields project to `null` rather than failing.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: Value,
    pub longitude: Value,
}

/// Current conditions for a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub location: Value,
    pub coordinates: Coordinates,
    pub current: Value,
    pub timezone: Value,
}

/// Daily forecast for a location, optionally truncated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub location: Value,
    pub coordinates: Coordinates,
    pub timezone: Value,
    pub days: Vec<Value>,
}

/// Projects the current-conditions view out of a record.
pub fn current_view(record: &Value) -> CurrentView {
    CurrentView {
        location: resolved_location(record),
        coordinates: coordinates(record),
        current: field(record, "currentConditions"),
        timezone: field(record, "timezone"),
    }
}

/// Projects the forecast view, keeping the first `count` days when `count`
/// parses as a positive integer and all days otherwise.
pub fn forecast_view(record: &Value, count: Option<&str>) -> ForecastView {
    let days = record
        .get("days")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    ForecastView {
        location: resolved_location(record),
        coordinates: coordinates(record),
        timezone: field(record, "timezone"),
        days: truncate_days(days, count),
    }
}

/// Keeps the first `count` entries when `count` is a positive integer.
///
/// Zero, negative and non-numeric counts are ignored, not rejected.
pub fn truncate_days(mut days: Vec<Value>, count: Option<&str>) -> Vec<Value> {
    if let Some(n) = count
        .and_then(|c| c.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
    {
        days.truncate(n);
    }
    days
}

fn resolved_location(record: &Value) -> Value {
    record
        .get("resolvedAddress")
        .or_else(|| record.get("address"))
        .cloned()
        .unwrap_or(Value::Null)
}

fn coordinates(record: &Value) -> Coordinates {
    Coordinates {
        latitude: field(record, "latitude"),
        longitude: field(record, "longitude"),
    }
}

fn field(record: &Value, name: &str) -> Value {
    record.get(name).cloned().unwrap_or(Value::Null)
}
