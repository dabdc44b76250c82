//! Wire schema for urge event datasets
//!
//! The on-disk shape is nested:
//!
//! ```json
//! {
//!   "user_id": "synthetic_user_01",
//!   "events": [
//!     {
//!       "event_id": "1",
//!       "timestamp": "2025-06-01T21:04:11.532Z",
//!       "urge": { "outcome": "relapsed", "feeling": "fatigued", "intensity": 3 },
//!       "streak": { "current_streak_days": 0, "longest_streak_days": 41 },
//!       "meta": { "location_context": "home" }
//!     }
//!   ]
//! }
//! ```
//!
//! [`RawEvent::into_event`] is the only place that knows how this maps onto
//! the flat [`Event`] the analysis works on.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RecordError;
use crate::types::{Event, Outcome};

/// Naive timestamp layouts accepted when no offset is present; read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Self-reported intensity scale.
const INTENSITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Dataset envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// One event as it appears on the wire
///
/// Only `timestamp` and `urge.outcome` are required. The optional fields are
/// decoded leniently: a value of the wrong type or out of range is logged
/// and treated as absent rather than rejecting the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, alias = "id", deserialize_with = "string_or_number")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub urge: RawUrge,
    #[serde(default, deserialize_with = "lenient_section")]
    pub streak: RawStreak,
    #[serde(default, deserialize_with = "lenient_section")]
    pub meta: RawMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUrge {
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub feeling: Option<String>,
    #[serde(default, deserialize_with = "lenient_intensity")]
    pub intensity: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStreak {
    #[serde(default, deserialize_with = "lenient")]
    pub current_streak_days: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub longest_streak_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMeta {
    #[serde(default, deserialize_with = "lenient")]
    pub location_context: Option<String>,
}

/// Decode an optional field, treating a malformed value as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(&value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(e) => {
            tracing::warn!(%value, error = %e, "Ignoring malformed optional field");
            Ok(None)
        }
    }
}

/// Intensity must be a whole number in 1..=5.
fn lenient_intensity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let intensity: Option<u8> = lenient(deserializer)?;
    Ok(intensity.filter(|value| {
        let in_range = INTENSITY_RANGE.contains(value);
        if !in_range {
            tracing::warn!(intensity = *value, "Ignoring out-of-range intensity");
        }
        in_range
    }))
}

/// Decode a nested optional section, falling back to its default when malformed.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

impl RawEvent {
    /// Map the wire record onto a validated [`Event`].
    ///
    /// `fallback_id` is used when the record carries neither `event_id` nor `id`.
    pub fn into_event(self, fallback_id: impl FnOnce() -> String) -> Result<Event, RecordError> {
        let raw_ts = self
            .timestamp
            .ok_or(RecordError::MissingField("timestamp"))?;
        let timestamp = parse_timestamp(&raw_ts)?;
        let outcome = self
            .urge
            .outcome
            .as_deref()
            .map(Outcome::from_label)
            .ok_or(RecordError::MissingField("urge.outcome"))?;

        Ok(Event {
            id: self.event_id.unwrap_or_else(fallback_id),
            timestamp,
            outcome,
            feeling: self.urge.feeling.filter(|f| !f.trim().is_empty()),
            intensity: self.urge.intensity,
            current_streak_days: self.streak.current_streak_days,
            longest_streak_days: self.streak.longest_streak_days,
            location_context: self.meta.location_context,
        })
    }
}

/// Ids may be written as strings or bare numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Parse an ISO-8601 timestamp.
///
/// RFC 3339 strings keep their offset. Strings without an offset are read
/// as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, RecordError> {
    let trimmed = value.trim();
    let rfc3339_err = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(ts) => return Ok(ts),
        Err(e) => e,
    };

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| RecordError::MalformedTimestamp {
            value: value.to_string(),
            message: rfc3339_err.to_string(),
        })
}

/// Format a timestamp the way the generator writes it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
