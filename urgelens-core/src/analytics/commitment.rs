//! Commitment & consistency: rolling resistance score and relapse spacing.

use chrono::Duration;

use super::report::CommitmentInsights;
use super::stats::Tally;
use crate::types::EnrichedEvent;

pub fn analyze(events: &[EnrichedEvent<'_>], window_days: u32) -> CommitmentInsights {
    CommitmentInsights {
        commitment_score_rolling_30d_avg: commitment_score(events, window_days),
        avg_time_to_relapse_hours: avg_time_to_relapse_hours(events),
    }
}

/// Resistance percentage over the trailing `window_days` ending at the most
/// recent event.
///
/// The window is closed on both ends: `[last - window_days, last]`. Only the
/// final window is evaluated. An empty input scores 0.
pub fn commitment_score(events: &[EnrichedEvent<'_>], window_days: u32) -> f64 {
    let Some(last) = events.iter().map(EnrichedEvent::timestamp).max() else {
        return 0.0;
    };
    let window_start = last - Duration::days(i64::from(window_days));

    let mut tally = Tally::default();
    for e in events {
        let ts = e.timestamp();
        if ts >= window_start && ts <= last {
            tally.record(e.is_resisted);
        }
    }

    // The last event is always inside its own window.
    tally.pct().unwrap_or(0.0)
}

/// Mean gap between consecutive relapses, in hours.
///
/// `None` with fewer than two relapses.
pub fn avg_time_to_relapse_hours(events: &[EnrichedEvent<'_>]) -> Option<f64> {
    let mut relapses: Vec<_> = events
        .iter()
        .filter(|e| e.is_relapsed)
        .map(EnrichedEvent::timestamp)
        .collect();
    if relapses.len() < 2 {
        return None;
    }
    relapses.sort();

    let total_ms: i64 = relapses
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_milliseconds())
        .sum();
    let gaps = (relapses.len() - 1) as f64;

    Some(total_ms as f64 / gaps / 3_600_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::event;
    use crate::types::{enrich, Outcome};

    #[test]
    fn test_single_resisted_event_scores_100() {
        let events = vec![event("2025-01-01T09:00:00Z", Outcome::Resisted, "bored")];
        let enriched = enrich(&events);
        assert_eq!(commitment_score(&enriched, 30), 100.0);
        assert_eq!(avg_time_to_relapse_hours(&enriched), None);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let insights = analyze(&enrich(&[]), 30);
        assert_eq!(insights.commitment_score_rolling_30d_avg, 0.0);
        assert_eq!(insights.avg_time_to_relapse_hours, None);
    }

    #[test]
    fn test_window_excludes_older_events() {
        let events = vec![
            // Outside the window
            event("2025-01-01T00:00:00Z", Outcome::Relapsed, "bored"),
            event("2025-01-10T00:00:00Z", Outcome::Relapsed, "bored"),
            // Exactly on the boundary: included
            event("2025-01-31T00:00:00Z", Outcome::Relapsed, "bored"),
            event("2025-02-15T00:00:00Z", Outcome::Resisted, "bored"),
            event("2025-03-02T00:00:00Z", Outcome::Resisted, "bored"),
        ];
        let enriched = enrich(&events);
        let score = commitment_score(&enriched, 30);
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input_uses_latest_event() {
        let events = vec![
            event("2025-03-02T00:00:00Z", Outcome::Resisted, "bored"),
            event("2025-01-01T00:00:00Z", Outcome::Relapsed, "bored"),
        ];
        assert_eq!(commitment_score(&enrich(&events), 30), 100.0);
    }

    #[test]
    fn test_avg_time_to_relapse() {
        let events = vec![
            event("2025-01-02T06:00:00Z", Outcome::Relapsed, "bored"),
            event("2025-01-01T00:00:00Z", Outcome::Relapsed, "bored"),
            event("2025-01-01T03:00:00Z", Outcome::Resisted, "bored"),
            event("2025-01-01T12:00:00Z", Outcome::Relapsed, "bored"),
        ];
        // Gaps: 12h and 18h
        assert_eq!(avg_time_to_relapse_hours(&enrich(&events)), Some(15.0));
    }

    #[test]
    fn test_simultaneous_relapses_average_zero() {
        let events = vec![
            event("2025-01-01T00:00:00Z", Outcome::Relapsed, "bored"),
            event("2025-01-01T00:00:00Z", Outcome::Relapsed, "neutral"),
        ];
        assert_eq!(avg_time_to_relapse_hours(&enrich(&events)), Some(0.0));
    }
}
