//! Integration tests for the urgelens load → analyze pipeline
//!
//! These tests use fixture files in `tests/fixtures/` and generated
//! datasets to verify the end-to-end flow through the public API.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;
use urgelens_core::config::{AnalysisConfig, GeneratorConfig, InvalidRecordPolicy};
use urgelens_core::{generator, ingest, Error, InsightEngine};

/// Get the path to a fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ============================================
// Fixture dataset
// ============================================

#[test]
fn test_fixture_report_end_to_end() {
    let dataset = ingest::load_path(&fixture_path("small-dataset.json"), InvalidRecordPolicy::Skip)
        .expect("fixture should load");
    assert_eq!(dataset.user_id.as_deref(), Some("fixture_user"));
    assert_eq!(dataset.events.len(), 6);
    assert_eq!(dataset.skipped.len(), 1);
    assert_eq!(dataset.skipped[0].id.as_deref(), Some("7"));

    let report = InsightEngine::default().analyze_dataset(&dataset);

    // Summary
    assert_eq!(report.summary.total_events, 6);
    assert_eq!(report.summary.skipped_records, 1);
    assert_eq!(
        report.summary.last_event.as_deref(),
        Some("2025-06-03T09:45:00+00:00")
    );

    // Event level
    let rates = report.event_level.urge_outcome_rate.expect("rates");
    assert!(approx(rates.relapsed_pct, 100.0 / 3.0));
    assert!(approx(rates.resisted_pct, 200.0 / 3.0));
    let correlation = &report.event_level.feeling_to_outcome_correlation;
    assert_eq!(correlation["fatigued"], 100.0);
    assert_eq!(correlation["bored"], 0.0);
    assert_eq!(correlation["neutral"], 0.0);
    let index = &report.event_level.feeling_strength_index;
    assert!(approx(index["fatigued"].unwrap(), 3.0));
    assert_eq!(index["bored"], Some(0.0));

    // Time based
    assert_eq!(report.time_based.peak_relapse_hours, vec![22]);
    assert_eq!(report.time_based.peak_resistance_hours, vec![9, 14]);
    let days: Vec<_> = report
        .time_based
        .relapse_by_day_of_week
        .iter()
        .map(|d| (d.day.as_str(), d.pct))
        .collect();
    assert_eq!(
        days,
        vec![
            ("Wednesday", 100.0),
            ("Monday", 50.0),
            ("Tuesday", 0.0),
            ("Thursday", 0.0)
        ]
    );
    assert_eq!(
        report.time_based.recovery_progress_over_time_pct,
        BTreeMap::from([("2025-05".to_string(), 50.0), ("2025-06".to_string(), 100.0)])
    );

    // Commitment
    assert!(approx(
        report.commitment.commitment_score_rolling_30d_avg,
        200.0 / 3.0
    ));
    assert_eq!(report.commitment.avg_time_to_relapse_hours, Some(48.5));

    // Feelings and risk
    assert_eq!(
        report.feeling_dynamics.most_vulnerable_feeling.as_deref(),
        Some("fatigued")
    );
    assert_eq!(
        report.feeling_dynamics.most_protective_feeling.as_deref(),
        Some("bored")
    );
    let profile = report
        .user_feedback_loops
        .personalized_risk_profile
        .expect("risk profile");
    assert_eq!(profile.feeling, "fatigued");
    assert_eq!(profile.hour, 22);
    assert_eq!(profile.risk_pct, 100.0);
}

#[test]
fn test_fixture_with_short_window() {
    let dataset =
        ingest::load_path(&fixture_path("small-dataset.json"), InvalidRecordPolicy::Skip).unwrap();
    let engine = InsightEngine::new(AnalysisConfig {
        commitment_window_days: 7,
        ..Default::default()
    });
    let report = engine.analyze_dataset(&dataset);
    assert_eq!(report.commitment.commitment_score_rolling_30d_avg, 100.0);
}

#[test]
fn test_fixture_abort_policy() {
    let err = ingest::load_path(&fixture_path("small-dataset.json"), InvalidRecordPolicy::Abort)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRecord { index: 6, .. }));
}

#[test]
fn test_report_json_has_stable_keys() {
    let dataset =
        ingest::load_path(&fixture_path("small-dataset.json"), InvalidRecordPolicy::Skip).unwrap();
    let report = InsightEngine::default().analyze_dataset(&dataset);
    let value = serde_json::to_value(&report).unwrap();

    for section in [
        "summary",
        "event_level",
        "time_based",
        "commitment",
        "feeling_dynamics",
        "user_feedback_loops",
    ] {
        assert!(value.get(section).is_some(), "missing section {section}");
    }
    assert_eq!(
        value["event_level"]["urge_outcome_rate"]["resisted_pct"]
            .as_f64()
            .map(f64::round),
        Some(67.0)
    );
    assert_eq!(
        value["time_based"]["relapse_by_day_of_week"][0]["day"],
        "Wednesday"
    );
    assert_eq!(
        value["user_feedback_loops"]["personalized_risk_profile"]["hour"],
        22
    );
}

#[test]
fn test_empty_report_serializes_nulls() {
    let report = InsightEngine::default().analyze(&[]);
    let value = serde_json::to_value(&report).unwrap();

    assert!(value["event_level"]["urge_outcome_rate"].is_null());
    assert!(value["commitment"]["avg_time_to_relapse_hours"].is_null());
    assert_eq!(value["commitment"]["commitment_score_rolling_30d_avg"], 0.0);
    assert!(value["feeling_dynamics"]["most_vulnerable_feeling"].is_null());
    assert!(value["user_feedback_loops"]["personalized_risk_profile"].is_null());
}

// ============================================
// Generated datasets
// ============================================

#[test]
fn test_generated_dataset_recovers_bias() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("synthetic_data.json");
    let now = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();

    let config = GeneratorConfig {
        dataset_size: 3000,
        seed: Some(2024),
        ..Default::default()
    };
    let dataset = generator::generate(&config, now).unwrap();
    generator::write_dataset(&path, &dataset).unwrap();

    let loaded = ingest::load_path(&path, InvalidRecordPolicy::Abort).unwrap();
    let report = InsightEngine::default().analyze_dataset(&loaded);

    // Default bias: fatigued 60%, bored 30%, neutral 20%
    let correlation = &report.event_level.feeling_to_outcome_correlation;
    assert!((correlation["fatigued"] - 60.0).abs() < 6.0);
    assert!((correlation["bored"] - 30.0).abs() < 6.0);
    assert!((correlation["neutral"] - 20.0).abs() < 6.0);
    assert_eq!(
        report.feeling_dynamics.most_vulnerable_feeling.as_deref(),
        Some("fatigued")
    );

    let index = &report.event_level.feeling_strength_index;
    assert!(index["fatigued"].unwrap() > 1.0);
    assert!(index["neutral"].unwrap() < 1.0);

    let rates = report.event_level.urge_outcome_rate.unwrap();
    assert!(approx(rates.resisted_pct + rates.relapsed_pct, 100.0));

    assert!(report.time_based.peak_relapse_hours.len() <= 3);
    assert!(report
        .time_based
        .peak_relapse_hours
        .iter()
        .all(|h| *h < 24));
    assert!(report.commitment.avg_time_to_relapse_hours.unwrap() >= 0.0);
}
