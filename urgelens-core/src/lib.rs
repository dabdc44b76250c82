//! # urgelens-core
//!
//! Core library for urgelens - behavioral insights from urge event logs.
//!
//! This library provides:
//! - Domain types for urge events and their derived fields
//! - Dataset ingestion with a per-record invalid-data policy
//! - The insight engine and its aggregation passes
//! - A synthetic dataset generator
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Layer 0 (Raw):** Nested JSON records on disk (immutable)
//! - **Layer 1 (Canonical):** Validated [`Event`]s, enriched per run
//! - **Layer 2 (Derived):** The [`InsightsReport`] (regenerable, never stored)
//!
//! ## Example
//!
//! ```rust,no_run
//! use urgelens_core::{ingest, Config, InsightEngine};
//!
//! let config = Config::load().expect("failed to load config");
//! let dataset = ingest::load_path(
//!     "synthetic_data.json".as_ref(),
//!     config.analysis.invalid_records,
//! )
//! .expect("failed to load dataset");
//!
//! let report = InsightEngine::new(config.analysis.clone()).analyze_dataset(&dataset);
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{InsightEngine, InsightsReport};
pub use config::Config;
pub use error::{Error, RecordError, Result};
pub use ingest::{LoadedDataset, SkippedRecord};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod ingest;
pub mod logging;
pub mod types;
