//! Time values found in playlist items
//!
//! Playlists carry start times and durations either as plain numbers of
//! seconds or as strings in several notations:
//! - "SS", "SS.mmm" (also with a comma decimal separator)
//! - "MM:SS", "HH:MM:SS"
//! - "45s", "2m", "1.5h"

use serde::{Deserialize, Serialize};

/// A time expressed either numerically or as text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Seconds(f64),
    Text(String),
}

impl TimeValue {
    /// The value in seconds; anything unparseable counts as 0.
    pub fn seconds(&self) -> f64 {
        match self {
            TimeValue::Seconds(value) if value.is_finite() => *value,
            TimeValue::Seconds(_) => 0.0,
            TimeValue::Text(text) => parse_seconds(text),
        }
    }
}

impl From<f64> for TimeValue {
    fn from(value: f64) -> Self {
        TimeValue::Seconds(value)
    }
}

impl From<&str> for TimeValue {
    fn from(value: &str) -> Self {
        TimeValue::Text(value.to_string())
    }
}

/// Seconds for an optional time value, 0 when absent.
pub fn seconds_or_zero(value: Option<&TimeValue>) -> f64 {
    value.map_or(0.0, TimeValue::seconds)
}

/// Parses a textual time into seconds. Returns 0 when the input is empty or
/// not a number in any supported notation.
pub fn parse_seconds(input: &str) -> f64 {
    let input = input.trim().replace(',', ".");
    if input.is_empty() {
        return 0.0;
    }

    let parsed = if let Some(value) = input.strip_suffix('s') {
        value.parse::<f64>().ok()
    } else if let Some(value) = input.strip_suffix('m') {
        value.parse::<f64>().ok().map(|m| m * 60.0)
    } else if let Some(value) = input.strip_suffix('h') {
        value.parse::<f64>().ok().map(|h| h * 3600.0)
    } else if input.contains(':') {
        parse_clock(&input)
    } else {
        input.parse::<f64>().ok()
    };

    parsed.filter(|value| value.is_finite()).unwrap_or(0.0)
}

fn parse_clock(input: &str) -> Option<f64> {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut total = 0.0;
    for part in parts {
        total = total * 60.0 + part.parse::<f64>().ok()?;
    }
    Some(total)
}
