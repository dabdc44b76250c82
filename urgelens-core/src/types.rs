//! Core domain types for urgelens
//!
//! These types represent the canonical, flattened event model that every
//! aggregation pass works on. The nested wire shape lives in
//! [`crate::ingest::schema`] and is mapped onto these types exactly once.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Urge event** | A single logged craving, with an outcome |
//! | **Outcome** | What happened: resisted, relapsed, or something else |
//! | **Feeling** | Self-reported emotional/contextual label (open set) |
//! | **Streak** | Consecutive days without relapse, as reported by the source |

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Weekday};
use serde::{Deserialize, Serialize};

// ============================================
// Outcome
// ============================================

/// Outcome of an urge event.
///
/// Only `resisted` and `relapsed` carry meaning for the analysis; anything
/// else is preserved verbatim in [`Outcome::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Resisted,
    Relapsed,
    Other(String),
}

impl Outcome {
    /// Map a raw outcome label. Matching ignores case and surrounding whitespace.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "resisted" => Outcome::Resisted,
            "relapsed" => Outcome::Relapsed,
            _ => Outcome::Other(label.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Outcome::Resisted => "resisted",
            Outcome::Relapsed => "relapsed",
            Outcome::Other(label) => label,
        }
    }
}

// ============================================
// Event
// ============================================

/// A validated urge event.
///
/// Immutable once loaded. `longest_streak_days >= current_streak_days` is
/// expected of well-formed sources but not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Source identifier (uniqueness assumed, not enforced)
    pub id: String,
    /// When the urge happened, in the offset it was recorded with
    pub timestamp: DateTime<FixedOffset>,
    pub outcome: Outcome,
    /// Feeling label; events without one are left out of feeling groupings
    pub feeling: Option<String>,
    /// Self-reported intensity, 1-5
    pub intensity: Option<u8>,
    pub current_streak_days: Option<u32>,
    pub longest_streak_days: Option<u32>,
    pub location_context: Option<String>,
}

// ============================================
// Enriched event
// ============================================

/// An [`Event`] plus the derived fields the aggregation passes group on.
///
/// All derived fields are pure functions of the timestamp and outcome.
/// Instances live for the duration of a single analysis run.
#[derive(Debug, Clone)]
pub struct EnrichedEvent<'a> {
    pub event: &'a Event,
    /// Hour of day (0-23) on the event's own wall clock
    pub hour_of_day: u32,
    pub day_of_week: Weekday,
    /// Calendar month bucket, `YYYY-MM`
    pub month: String,
    pub is_resisted: bool,
    pub is_relapsed: bool,
}

impl<'a> EnrichedEvent<'a> {
    pub fn new(event: &'a Event) -> Self {
        let ts = event.timestamp;
        Self {
            event,
            hour_of_day: ts.hour(),
            day_of_week: ts.weekday(),
            month: format!("{:04}-{:02}", ts.year(), ts.month()),
            is_resisted: event.outcome == Outcome::Resisted,
            is_relapsed: event.outcome == Outcome::Relapsed,
        }
    }

    pub fn feeling(&self) -> Option<&'a str> {
        self.event.feeling.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.event.timestamp
    }
}

/// Enrich a slice of events, preserving input order.
pub fn enrich(events: &[Event]) -> Vec<EnrichedEvent<'_>> {
    events.iter().map(EnrichedEvent::new).collect()
}

/// Full English name for a weekday (e.g., "Monday").
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(ts: &str, outcome: Outcome) -> Event {
        Event {
            id: "1".to_string(),
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
            outcome,
            feeling: Some("bored".to_string()),
            intensity: Some(3),
            current_streak_days: Some(0),
            longest_streak_days: Some(4),
            location_context: None,
        }
    }

    #[test]
    fn test_outcome_from_label() {
        assert_eq!(Outcome::from_label("resisted"), Outcome::Resisted);
        assert_eq!(Outcome::from_label(" Relapsed "), Outcome::Relapsed);
        assert_eq!(
            Outcome::from_label("skipped"),
            Outcome::Other("skipped".to_string())
        );
        assert_eq!(Outcome::from_label("skipped").as_str(), "skipped");
    }

    #[test]
    fn test_enrichment_derives_calendar_fields() {
        // 2024-03-09 is a Saturday
        let event = event_at("2024-03-09T21:15:00Z", Outcome::Relapsed);
        let enriched = EnrichedEvent::new(&event);

        assert_eq!(enriched.hour_of_day, 21);
        assert_eq!(enriched.day_of_week, Weekday::Sat);
        assert_eq!(day_name(enriched.day_of_week), "Saturday");
        assert_eq!(enriched.month, "2024-03");
        assert!(enriched.is_relapsed);
        assert!(!enriched.is_resisted);
    }

    #[test]
    fn test_enrichment_uses_recorded_offset() {
        let event = event_at("2024-01-01T01:30:00+05:00", Outcome::Resisted);
        let enriched = EnrichedEvent::new(&event);

        assert_eq!(enriched.hour_of_day, 1);
        assert_eq!(enriched.month, "2024-01");
        assert!(enriched.is_resisted);
    }

    #[test]
    fn test_other_outcome_is_neither() {
        let event = event_at("2024-01-01T00:00:00Z", Outcome::Other("unknown".into()));
        let enriched = EnrichedEvent::new(&event);
        assert!(!enriched.is_resisted);
        assert!(!enriched.is_relapsed);
    }
}
