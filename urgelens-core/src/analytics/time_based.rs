//! Time-based insights: peak hours, weekday patterns, monthly progress.

use std::collections::BTreeMap;

use chrono::Weekday;

use super::report::{DayRate, TimeBasedInsights};
use super::stats::{count_by, tally_by, top_by_count};
use crate::types::{day_name, EnrichedEvent};

pub fn analyze(events: &[EnrichedEvent<'_>], peak_hours_limit: usize) -> TimeBasedInsights {
    TimeBasedInsights {
        peak_relapse_hours: peak_relapse_hours(events, peak_hours_limit),
        peak_resistance_hours: peak_resistance_hours(events, peak_hours_limit),
        relapse_by_day_of_week: relapse_by_day_of_week(events),
        recovery_progress_over_time_pct: recovery_progress_over_time(events),
    }
}

/// Hours with the most relapses, most frequent first; ties go to the earlier hour.
pub fn peak_relapse_hours(events: &[EnrichedEvent<'_>], limit: usize) -> Vec<u32> {
    peak_hours(events.iter().filter(|e| e.is_relapsed), limit)
}

/// Hours with the most resisted urges, most frequent first; ties go to the earlier hour.
pub fn peak_resistance_hours(events: &[EnrichedEvent<'_>], limit: usize) -> Vec<u32> {
    peak_hours(events.iter().filter(|e| e.is_resisted), limit)
}

fn peak_hours<'e, 'a: 'e>(
    events: impl Iterator<Item = &'e EnrichedEvent<'a>>,
    limit: usize,
) -> Vec<u32> {
    let counts = count_by(events.map(|e| e.hour_of_day));
    top_by_count(&counts, limit)
}

/// Relapse percentage per weekday, highest first.
///
/// Only weekdays present in the data appear. Equal percentages keep
/// Monday-to-Sunday order.
pub fn relapse_by_day_of_week(events: &[EnrichedEvent<'_>]) -> Vec<DayRate> {
    let tallies = tally_by(
        events
            .iter()
            .map(|e| (e.day_of_week.num_days_from_monday(), e.is_relapsed)),
    );

    let mut rates: Vec<(u32, f64)> = tallies
        .into_iter()
        .filter_map(|(day, tally)| Some((day, tally.pct()?)))
        .collect();
    rates.sort_by(|a, b| b.1.total_cmp(&a.1));

    rates
        .into_iter()
        .map(|(day, pct)| DayRate {
            day: day_name(weekday_from_monday(day)).to_string(),
            pct,
        })
        .collect()
}

/// Resistance percentage per calendar month, keyed `YYYY-MM`.
pub fn recovery_progress_over_time(events: &[EnrichedEvent<'_>]) -> BTreeMap<String, f64> {
    tally_by(events.iter().map(|e| (e.month.as_str(), e.is_resisted)))
        .into_iter()
        .filter_map(|(month, tally)| Some((month.to_string(), tally.pct()?)))
        .collect()
}

fn weekday_from_monday(days: u32) -> Weekday {
    match days {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
