//! Analytics module for urgelens
//!
//! Derives behavioral insights from a batch of urge events:
//! - Event-level outcome rates and feeling/relapse relationships
//! - Time-based patterns (peak hours, weekdays, monthly progress)
//! - Commitment score and relapse spacing
//! - Feeling dynamics
//! - A personalized risk profile
//!
//! See [`engine`] for how the passes are combined into an [`InsightsReport`].

pub mod commitment;
pub mod engine;
pub mod event_level;
pub mod feelings;
pub mod report;
pub mod risk;
pub mod stats;
pub mod time_based;

pub use engine::InsightEngine;
pub use report::{
    CommitmentInsights, DayRate, EventLevelInsights, FeelingDynamics, InsightsReport,
    OutcomeRates, ReportSummary, RiskProfile, TimeBasedInsights, UserFeedback,
};
