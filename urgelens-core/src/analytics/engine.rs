//! Insight engine
//!
//! Runs the aggregation passes over one enriched dataset and merges their
//! results into an [`InsightsReport`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INSIGHT ENGINE                           │
//! │                                                                 │
//! │   events ──► enrich() ──► Vec<EnrichedEvent>  (read-only)       │
//! │                                  │                              │
//! │       ┌──────────┬───────────┬───┴───────┬───────────┐          │
//! │       ▼          ▼           ▼           ▼           ▼          │
//! │  event_level time_based commitment   feelings      risk         │
//! │       │          │           │           │           │          │
//! │       └──────────┴───────────┴─────┬─────┴───────────┘          │
//! │                                    ▼                            │
//! │                             InsightsReport                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each pass only reads the enriched events and returns its own section, so
//! the passes are independent and the whole run is a pure function of its
//! input.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use urgelens_core::analytics::InsightEngine;
//!
//! let engine = InsightEngine::default();
//! let report = engine.analyze_dataset(&dataset);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

use std::time::Instant;

use super::report::{InsightsReport, ReportSummary};
use super::{commitment, event_level, feelings, risk, time_based};
use crate::config::AnalysisConfig;
use crate::ingest::LoadedDataset;
use crate::types::{enrich, EnrichedEvent, Event};

/// Turns a batch of events into an insights report.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: AnalysisConfig,
}

impl InsightEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyze a loaded dataset, carrying its skipped-record count into the summary.
    pub fn analyze_dataset(&self, dataset: &LoadedDataset) -> InsightsReport {
        let mut report = self.analyze(&dataset.events);
        report.summary.skipped_records = dataset.skipped.len();
        report
    }

    /// Analyze a batch of events.
    ///
    /// Never fails: metrics without enough data come back as `None`, empty
    /// collections, or zero where the metric defines one.
    pub fn analyze(&self, events: &[Event]) -> InsightsReport {
        let started = Instant::now();
        let enriched = enrich(events);

        let report = InsightsReport {
            summary: summarize(&enriched),
            event_level: timed("event_level", || event_level::analyze(&enriched)),
            time_based: timed("time_based", || {
                time_based::analyze(&enriched, self.config.peak_hours_limit)
            }),
            commitment: timed("commitment", || {
                commitment::analyze(&enriched, self.config.commitment_window_days)
            }),
            feeling_dynamics: timed("feeling_dynamics", || feelings::analyze(&enriched)),
            user_feedback_loops: timed("user_feedback_loops", || risk::analyze(&enriched)),
        };

        tracing::info!(
            events = events.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Insights report generated"
        );

        report
    }
}

fn timed<T>(section: &'static str, pass: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let output = pass();
    tracing::debug!(
        section,
        duration_us = started.elapsed().as_micros() as u64,
        "Aggregation pass complete"
    );
    output
}

fn summarize(events: &[EnrichedEvent<'_>]) -> ReportSummary {
    let first = events.iter().map(EnrichedEvent::timestamp).min();
    let last = events.iter().map(EnrichedEvent::timestamp).max();
    ReportSummary {
        total_events: events.len(),
        skipped_records: 0,
        first_event: first.map(|ts| ts.to_rfc3339()),
        last_event: last.map(|ts| ts.to_rfc3339()),
    }
}
