//! Event-level insights: outcome rates and feeling/outcome relationships.

use std::collections::BTreeMap;

use super::report::{EventLevelInsights, OutcomeRates};
use super::stats::{tally_by, Tally};
use crate::types::EnrichedEvent;

pub fn analyze(events: &[EnrichedEvent<'_>]) -> EventLevelInsights {
    EventLevelInsights {
        urge_outcome_rate: outcome_rates(events),
        feeling_to_outcome_correlation: feeling_to_outcome_correlation(events),
        feeling_strength_index: feeling_strength_index(events),
    }
}

/// Share of resisted and relapsed events, as percentages.
///
/// `None` for an empty input. The two values need not sum to 100 since
/// events can have other outcomes.
pub fn outcome_rates(events: &[EnrichedEvent<'_>]) -> Option<OutcomeRates> {
    let mut resisted = Tally::default();
    let mut relapsed = Tally::default();
    for e in events {
        resisted.record(e.is_resisted);
        relapsed.record(e.is_relapsed);
    }

    Some(OutcomeRates {
        resisted_pct: resisted.pct()?,
        relapsed_pct: relapsed.pct()?,
    })
}

/// Relapse percentage per feeling.
pub fn feeling_to_outcome_correlation(events: &[EnrichedEvent<'_>]) -> BTreeMap<String, f64> {
    relapse_tallies_by_feeling(events)
        .into_iter()
        .filter_map(|(feeling, tally)| Some((feeling.to_string(), tally.pct()?)))
        .collect()
}

/// Relative relapse risk per feeling: the feeling's relapse rate divided by
/// the relapse rate across all events.
///
/// With zero relapses overall the ratio is undefined and every feeling maps
/// to `None`.
pub fn feeling_strength_index(events: &[EnrichedEvent<'_>]) -> BTreeMap<String, Option<f64>> {
    let mut baseline = Tally::default();
    for e in events {
        baseline.record(e.is_relapsed);
    }
    let baseline = baseline.rate().filter(|rate| *rate > 0.0);

    relapse_tallies_by_feeling(events)
        .into_iter()
        .map(|(feeling, tally)| {
            let index = baseline.and_then(|base| tally.rate().map(|rate| rate / base));
            (feeling.to_string(), index)
        })
        .collect()
}

fn relapse_tallies_by_feeling<'a>(events: &[EnrichedEvent<'a>]) -> BTreeMap<&'a str, Tally> {
    tally_by(
        events
            .iter()
            .filter_map(|e| e.feeling().map(|f| (f, e.is_relapsed))),
    )
}
