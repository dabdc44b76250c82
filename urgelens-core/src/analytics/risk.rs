//! Personalized risk profile: the riskiest (feeling, hour) combination.

use super::report::{RiskProfile, UserFeedback};
use super::stats::tally_by;
use crate::types::EnrichedEvent;

pub fn analyze(events: &[EnrichedEvent<'_>]) -> UserFeedback {
    UserFeedback {
        personalized_risk_profile: personalized_risk_profile(events),
    }
}

/// Group events by (feeling, hour) and pick the group with the highest
/// relapse rate.
///
/// Groups are visited in (feeling, hour) order and only a strictly higher
/// rate replaces the current best, so ties go to the alphabetically first
/// feeling and then the earliest hour. `None` when no event has a feeling.
pub fn personalized_risk_profile(events: &[EnrichedEvent<'_>]) -> Option<RiskProfile> {
    let groups = tally_by(
        events
            .iter()
            .filter_map(|e| e.feeling().map(|f| ((f, e.hour_of_day), e.is_relapsed))),
    );

    let mut best: Option<((&str, u32), f64)> = None;
    for (key, tally) in groups {
        let Some(rate) = tally.rate() else { continue };
        if best.map_or(true, |(_, best_rate)| rate > best_rate) {
            best = Some((key, rate));
        }
    }

    best.map(|((feeling, hour), rate)| RiskProfile {
        feeling: feeling.to_string(),
        hour,
        risk_pct: rate * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::event;
    use crate::types::{enrich, Outcome};

    #[test]
    fn test_picks_highest_relapse_group() {
        let events = vec![
            event("2025-01-01T22:00:00Z", Outcome::Relapsed, "fatigued"),
            event("2025-01-02T22:30:00Z", Outcome::Relapsed, "fatigued"),
            event("2025-01-03T22:45:00Z", Outcome::Resisted, "fatigued"),
            event("2025-01-01T09:00:00Z", Outcome::Relapsed, "bored"),
            event("2025-01-02T09:00:00Z", Outcome::Resisted, "bored"),
            event("2025-01-01T14:00:00Z", Outcome::Resisted, "neutral"),
        ];
        let profile = personalized_risk_profile(&enrich(&events)).unwrap();
        assert_eq!(profile.feeling, "fatigued");
        assert_eq!(profile.hour, 22);
        assert!((profile.risk_pct - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_prefers_feeling_then_hour() {
        let events = vec![
            event("2025-01-01T20:00:00Z", Outcome::Relapsed, "neutral"),
            event("2025-01-01T21:00:00Z", Outcome::Relapsed, "bored"),
            event("2025-01-01T07:00:00Z", Outcome::Relapsed, "bored"),
        ];
        let profile = personalized_risk_profile(&enrich(&events)).unwrap();
        assert_eq!(profile.feeling, "bored");
        assert_eq!(profile.hour, 7);
        assert_eq!(profile.risk_pct, 100.0);
    }

    #[test]
    fn test_no_relapses_still_reports_a_group() {
        let events = vec![
            event("2025-01-01T10:00:00Z", Outcome::Resisted, "neutral"),
            event("2025-01-01T08:00:00Z", Outcome::Resisted, "bored"),
        ];
        let profile = personalized_risk_profile(&enrich(&events)).unwrap();
        assert_eq!(profile.feeling, "bored");
        assert_eq!(profile.hour, 8);
        assert_eq!(profile.risk_pct, 0.0);
    }

    #[test]
    fn test_empty_input_has_no_profile() {
        assert_eq!(personalized_risk_profile(&enrich(&[])), None);
    }
}
