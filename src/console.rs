//! Interactive console front end.
//!
//! Parses one line of input into a [`Command`] and renders the result as
//! plain text. The prompt loop itself lives in the `weather_console` binary.

use serde_json::Value;

use crate::error::{Result, WeatherError};
use crate::weather::{LookupParams, WeatherService};

pub const HELP: &str = "\
Commands:
  <location> [name=value ...]    full lookup (unitGroup, include, elements, startDate, endDate)
  current <location> [name=value ...]
                                 current conditions
  forecast <location> [name=value ...] [days]
                                 daily forecast, optionally the first N days
  stats                          cache statistics
  flush                          empty the cache
  help                           this text
  quit | exit                    leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lookup {
        location: String,
        params: LookupParams,
    },
    Current {
        location: String,
        params: LookupParams,
    },
    Forecast {
        location: String,
        params: LookupParams,
        days: Option<String>,
    },
    Stats,
    Flush,
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Parses one input line.
    ///
    /// Locations may contain spaces; for `forecast` a trailing bare token is
    /// taken as the day count only when it is all digits.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&head) = tokens.first() else {
            return Ok(Command::Empty);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "quit" | "exit" => Command::Quit,
            "help" | "?" => Command::Help,
            "stats" => Command::Stats,
            "flush" => Command::Flush,
            "current" => {
                let (location, params) = location_and_params(&tokens[1..])?;
                Command::Current { location, params }
            }
            "forecast" => {
                let trailing_count = tokens.len() > 2
                    && tokens
                        .last()
                        .is_some_and(|t| t.chars().all(|c| c.is_ascii_digit()));
                let days = if trailing_count {
                    tokens.pop().map(str::to_string)
                } else {
                    None
                };
                let (location, params) = location_and_params(&tokens[1..])?;
                Command::Forecast {
                    location,
                    params,
                    days,
                }
            }
            _ => {
                let (location, params) = location_and_params(&tokens)?;
                Command::Lookup { location, params }
            }
        };

        Ok(command)
    }
}

/// Splits `name=value` tokens from the words that make up the location.
fn location_and_params(tokens: &[&str]) -> Result<(String, LookupParams)> {
    let (pairs, words): (Vec<&str>, Vec<&str>) = tokens.iter().partition(|t| t.contains('='));
    let params = LookupParams::from_pairs(pairs.iter().filter_map(|pair| pair.split_once('=')))?;

    if words.is_empty() {
        return Err(WeatherError::InvalidArgument("location required".to_string()));
    }
    Ok((words.join(" "), params))
}

/// Runs a command against the pipeline and renders the answer.
///
/// Returns `None` for [`Command::Quit`].
pub async fn execute(service: &WeatherService, command: Command) -> Result<Option<String>> {
    let output = match command {
        Command::Quit => return Ok(None),
        Command::Empty => String::new(),
        Command::Help => HELP.to_string(),
        Command::Stats => {
            let stats = service.stats().await;
            format!(
                "keys: {}  hits: {}  misses: {}  hit rate: {:.1}%",
                stats.keys,
                stats.hits,
                stats.misses,
                stats.hit_rate() * 100.0
            )
        }
        Command::Flush => {
            service.flush().await;
            "cache flushed".to_string()
        }
        Command::Lookup { location, params } => {
            let record = service.fetch(&location, &params).await?;
            render_summary(&record)
        }
        Command::Current { location, params } => {
            let view = service.current(&location, &params).await?;
            format!(
                "{} ({})\n{}",
                text(&view.location),
                text(&view.timezone),
                render_conditions(&view.current)
            )
        }
        Command::Forecast {
            location,
            params,
            days,
        } => {
            let view = service
                .forecast(&location, &params, days.as_deref())
                .await?;
            let mut lines = vec![format!("{} ({})", text(&view.location), text(&view.timezone))];
            lines.extend(view.days.iter().map(render_day));
            lines.join("\n")
        }
    };

    Ok(Some(output))
}

fn render_summary(record: &Value) -> String {
    let location = record
        .get("resolvedAddress")
        .or_else(|| record.get("address"))
        .map(text)
        .unwrap_or_else(|| "-".to_string());
    let days = record
        .get("days")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    let mut lines = vec![format!(
        "{} ({})",
        location,
        record.get("timezone").map(text).unwrap_or_else(|| "-".to_string())
    )];
    if let Some(current) = record.get("currentConditions") {
        lines.push(render_conditions(current));
    }
    lines.push(format!("{} forecast day(s)", days));
    lines.join("\n")
}

fn render_conditions(current: &Value) -> String {
    format!(
        "now: {}°, {}",
        current.get("temp").map(text).unwrap_or_else(|| "-".to_string()),
        current
            .get("conditions")
            .map(text)
            .unwrap_or_else(|| "-".to_string())
    )
}

fn render_day(day: &Value) -> String {
    let field = |name: &str| day.get(name).map(text).unwrap_or_else(|| "-".to_string());
    format!(
        "{}  min {}°  max {}°  {}",
        field("datetime"),
        field("tempmin"),
        field("tempmax"),
        field("conditions")
    )
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
