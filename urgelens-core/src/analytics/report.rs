//! Insights report
//!
//! The report is a nested, serializable structure with stable snake_case
//! keys. Metrics that lack enough data are `None` and serialize as `null`
//! so consumers can tell "no data" apart from a real zero.

use serde::Serialize;
use std::collections::BTreeMap;

/// Complete output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsReport {
    /// What went into the run
    pub summary: ReportSummary,
    pub event_level: EventLevelInsights,
    pub time_based: TimeBasedInsights,
    pub commitment: CommitmentInsights,
    pub feeling_dynamics: FeelingDynamics,
    pub user_feedback_loops: UserFeedback,
}

/// Input bookkeeping for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Events that were analyzed
    pub total_events: usize,
    /// Records dropped during ingestion
    pub skipped_records: usize,
    /// Earliest event timestamp (RFC 3339)
    pub first_event: Option<String>,
    /// Latest event timestamp (RFC 3339)
    pub last_event: Option<String>,
}

// ============================================
// Event-level
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventLevelInsights {
    /// `None` when there are no events
    pub urge_outcome_rate: Option<OutcomeRates>,
    /// feeling -> relapse percentage
    pub feeling_to_outcome_correlation: BTreeMap<String, f64>,
    /// feeling -> relapse rate / baseline relapse rate.
    /// Every value is `None` when the baseline is zero.
    pub feeling_strength_index: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeRates {
    pub resisted_pct: f64,
    pub relapsed_pct: f64,
}

// ============================================
// Time-based
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeBasedInsights {
    /// Busiest relapse hours, most frequent first
    pub peak_relapse_hours: Vec<u32>,
    /// Busiest resistance hours, most frequent first
    pub peak_resistance_hours: Vec<u32>,
    /// Relapse percentage per weekday, highest first
    pub relapse_by_day_of_week: Vec<DayRate>,
    /// `YYYY-MM` -> resistance percentage
    pub recovery_progress_over_time_pct: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRate {
    pub day: String,
    pub pct: f64,
}

// ============================================
// Commitment
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitmentInsights {
    /// Resistance percentage over the trailing window ending at the last event
    pub commitment_score_rolling_30d_avg: f64,
    /// Mean gap between consecutive relapses; `None` with fewer than two
    pub avg_time_to_relapse_hours: Option<f64>,
}

// ============================================
// Feelings and risk
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeelingDynamics {
    pub most_vulnerable_feeling: Option<String>,
    pub most_protective_feeling: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserFeedback {
    pub personalized_risk_profile: Option<RiskProfile>,
}

/// The (feeling, hour) combination with the highest observed relapse rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub feeling: String,
    pub hour: u32,
    pub risk_pct: f64,
}

impl RiskProfile {
    /// Human-readable sentence for presenters.
    pub fn message(&self) -> String {
        format!(
            "You're most at risk ({:.0}%) of relapsing when feeling '{}' during hour {}.",
            self.risk_pct, self.feeling, self.hour
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_profile_message() {
        let profile = RiskProfile {
            feeling: "fatigued".to_string(),
            hour: 22,
            risk_pct: 87.6,
        };
        assert_eq!(
            profile.message(),
            "You're most at risk (88%) of relapsing when feeling 'fatigued' during hour 22."
        );
    }

    #[test]
    fn test_missing_metrics_serialize_as_null() {
        let commitment = CommitmentInsights::default();
        let value = serde_json::to_value(&commitment).unwrap();
        assert_eq!(value["commitment_score_rolling_30d_avg"], 0.0);
        assert!(value["avg_time_to_relapse_hours"].is_null());

        let index = BTreeMap::from([("bored".to_string(), None::<f64>)]);
        let value = serde_json::to_value(&index).unwrap();
        assert!(value["bored"].is_null());
    }
}
