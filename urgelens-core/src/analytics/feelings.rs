//! Feeling dynamics: which feelings dominate relapses and resisted urges.
//!
//! Ties on the highest count resolve to the alphabetically first feeling.

use super::report::FeelingDynamics;
use super::stats::{count_by, mode};
use crate::types::EnrichedEvent;

pub fn analyze(events: &[EnrichedEvent<'_>]) -> FeelingDynamics {
    FeelingDynamics {
        most_vulnerable_feeling: most_vulnerable_feeling(events),
        most_protective_feeling: most_protective_feeling(events),
    }
}

/// Most common feeling among relapses.
pub fn most_vulnerable_feeling(events: &[EnrichedEvent<'_>]) -> Option<String> {
    feeling_mode(events.iter().filter(|e| e.is_relapsed))
}

/// Most common feeling among resisted urges.
pub fn most_protective_feeling(events: &[EnrichedEvent<'_>]) -> Option<String> {
    feeling_mode(events.iter().filter(|e| e.is_resisted))
}

fn feeling_mode<'e, 'a: 'e>(events: impl Iterator<Item = &'e EnrichedEvent<'a>>) -> Option<String> {
    let counts = count_by(events.filter_map(EnrichedEvent::feeling));
    mode(&counts).map(str::to_string)
}
