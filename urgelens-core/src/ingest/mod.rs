//! Ingestion layer for urge event datasets
//!
//! Turns raw JSON (Layer 0) into validated [`Event`]s (Layer 1) that the
//! analysis passes consume.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  Dataset file   │ ──► │ ingest_values()  │ ──► │  LoadedDataset  │
//! │ (events JSON)   │     │  per-record map  │     │ events + skips  │
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//!                               │
//!                               ▼
//!                    ┌──────────────────────┐
//!                    │ schema::RawEvent     │
//!                    │  └─ into_event()     │
//!                    └──────────────────────┘
//! ```
//!
//! ## Resilience
//!
//! Each record is decoded on its own. With [`InvalidRecordPolicy::Skip`] a
//! bad record is logged, remembered in [`LoadedDataset::skipped`] and the
//! rest of the file still loads. With [`InvalidRecordPolicy::Abort`] the
//! first bad record fails the load.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use urgelens_core::config::InvalidRecordPolicy;
//! use urgelens_core::ingest;
//!
//! let dataset = ingest::load_path("synthetic_data.json".as_ref(), InvalidRecordPolicy::Skip)?;
//! println!("{} events, {} skipped", dataset.events.len(), dataset.skipped.len());
//! ```

pub mod schema;

pub use schema::{RawDataset, RawEvent};

use crate::config::InvalidRecordPolicy;
use crate::error::{Error, RecordError, Result};
use crate::types::Event;
use serde::Deserialize;
use std::path::Path;

/// A record that was dropped during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position of the record in the input array
    pub index: usize,
    /// Record id, when one could be read
    pub id: Option<String>,
    pub reason: RecordError,
}

/// Result of loading a dataset.
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    /// `user_id` from the envelope, if present
    pub user_id: Option<String>,
    /// Valid events, in input order
    pub events: Vec<Event>,
    /// Records rejected under [`InvalidRecordPolicy::Skip`]
    pub skipped: Vec<SkippedRecord>,
}

impl LoadedDataset {
    /// Total records seen in the input
    pub fn total_records(&self) -> usize {
        self.events.len() + self.skipped.len()
    }
}

/// Accepted top-level shapes: the `{user_id, events}` envelope or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped {
        #[serde(default)]
        user_id: Option<String>,
        events: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

/// Load a dataset from a JSON file.
pub fn load_path(path: &Path, policy: InvalidRecordPolicy) -> Result<LoadedDataset> {
    tracing::debug!(path = %path.display(), "Loading dataset");
    let content = std::fs::read_to_string(path)?;
    load_str(&content, policy)
}

/// Load a dataset from a JSON string.
pub fn load_str(content: &str, policy: InvalidRecordPolicy) -> Result<LoadedDataset> {
    let (user_id, records) = match serde_json::from_str::<Envelope>(content)? {
        Envelope::Wrapped { user_id, events } => (user_id, events),
        Envelope::Bare(events) => (None, events),
    };

    let mut dataset = ingest_values(records, policy)?;
    dataset.user_id = user_id;
    Ok(dataset)
}

/// Convert already-deserialized records into events.
pub fn ingest_values(
    records: Vec<serde_json::Value>,
    policy: InvalidRecordPolicy,
) -> Result<LoadedDataset> {
    let mut dataset = LoadedDataset {
        events: Vec::with_capacity(records.len()),
        ..Default::default()
    };

    for (index, value) in records.into_iter().enumerate() {
        let id = record_id(&value);
        let converted = serde_json::from_value::<RawEvent>(value)
            .map_err(|e| RecordError::Shape(e.to_string()))
            .and_then(|raw| raw.into_event(|| format!("#{}", index)));

        match converted {
            Ok(event) => dataset.events.push(event),
            Err(reason) if policy == InvalidRecordPolicy::Skip => {
                tracing::warn!(index, id = ?id, %reason, "Skipping invalid record");
                dataset.skipped.push(SkippedRecord { index, id, reason });
            }
            Err(reason) => {
                return Err(Error::InvalidRecord {
                    index,
                    id,
                    source: reason,
                })
            }
        }
    }

    tracing::info!(
        events = dataset.events.len(),
        skipped = dataset.skipped.len(),
        "Dataset ingested"
    );

    Ok(dataset)
}

/// Best-effort id lookup on a record that may not decode.
fn record_id(value: &serde_json::Value) -> Option<String> {
    let id = value.get("event_id").or_else(|| value.get("id"))?;
    match id {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
