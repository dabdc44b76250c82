//! Error types for urgelens-core

use thiserror::Error;

/// Main error type for the urgelens-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A raw event record could not be turned into an [`Event`](crate::types::Event)
    #[error("invalid record at index {index}{}: {source}", id_suffix(.id))]
    InvalidRecord {
        index: usize,
        id: Option<String>,
        #[source]
        source: RecordError,
    },

    /// Synthetic data generation error
    #[error("generator error: {0}")]
    Generator(String),
}

/// Why a single raw record was rejected during ingestion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required field is absent or null
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The timestamp string did not parse
    #[error("malformed timestamp {value:?}: {message}")]
    MalformedTimestamp { value: String, message: String },

    /// The record is not shaped like an event object
    #[error("unexpected record shape: {0}")]
    Shape(String),
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_deref()
        .map(|id| format!(" (id {id})"))
        .unwrap_or_default()
}

/// Result type alias for urgelens-core
pub type Result<T> = std::result::Result<T, Error>;
