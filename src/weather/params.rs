//! Lookup parameters and cache-key derivation.
//!
//! A key is built from the trimmed location and only those parameters that
//! carry a non-empty value, always in the same order. Values are form-encoded so
//! that no parameter value can masquerade as a separator.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{Result, WeatherError};

/// Unit system requested from upstream when the caller names none.
pub const DEFAULT_UNIT_GROUP: &str = "metric";

/// Upstream query parameter names, in key-serialization order.
pub const PARAM_NAMES: [&str; 5] = ["unitGroup", "include", "elements", "startDate", "endDate"];

// == Lookup Params ==
/// Optional upstream parameters for a weather lookup.
///
/// Deserializes straight from an HTTP query string; empty strings behave
/// exactly like absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupParams {
    /// `us`, `uk`, `metric` or `base`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_group: Option<String>,
    /// Sections to include (`days`, `current`, `hours`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Element selector (`temp,humidity,...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl LookupParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds params from `(name, value)` pairs in any order.
    ///
    /// Unknown names are rejected; empty values are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (name, value) in pairs {
            params.set(name.as_ref(), value)?;
        }
        Ok(params)
    }

    /// Sets a single parameter by its upstream name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let slot = match name {
            "unitGroup" => &mut self.unit_group,
            "include" => &mut self.include,
            "elements" => &mut self.elements,
            "startDate" => &mut self.start_date,
            "endDate" => &mut self.end_date,
            other => {
                return Err(WeatherError::InvalidArgument(format!(
                    "unknown parameter: {}",
                    other
                )))
            }
        };

        let value = value.trim();
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        Ok(())
    }

    pub fn with_unit_group(mut self, unit_group: impl Into<String>) -> Self {
        self.unit_group = Some(unit_group.into());
        self
    }

    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    /// Present, non-empty parameters in fixed order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let fields = [
            &self.unit_group,
            &self.include,
            &self.elements,
            &self.start_date,
            &self.end_date,
        ];

        PARAM_NAMES
            .iter()
            .zip(fields)
            .filter_map(|(name, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (*name, v))
            })
            .collect()
    }

    /// Rejects a date range with only one end.
    pub fn validate(&self) -> Result<()> {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        if has(&self.start_date) != has(&self.end_date) {
            return Err(WeatherError::InvalidArgument(
                "startDate and endDate must be provided together".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of these params with the unit group filled in when missing.
    pub fn with_default_unit_group(&self) -> Self {
        let mut params = self.clone();
        if params
            .unit_group
            .as_deref()
            .map_or(true, |v| v.trim().is_empty())
        {
            params.unit_group = Some(DEFAULT_UNIT_GROUP.to_string());
        }
        params
    }
}

// == Cache Key ==
/// Canonical cache key for a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for `(location, params)`.
    pub fn derive(location: &str, params: &LookupParams) -> Self {
        let location: String = form_urlencoded::byte_serialize(location.trim().as_bytes()).collect();

        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in params.entries() {
            query.append_pair(name, value);
        }
        let query = query.finish();

        if query.is_empty() {
            Self(format!("weather:{}", location))
        } else {
            Self(format!("weather:{}?{}", location, query))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
