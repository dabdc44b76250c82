//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/urgelens/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/urgelens/` (~/.config/urgelens/)
//! - State/Logs: `$XDG_STATE_HOME/urgelens/` (~/.local/state/urgelens/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Analysis configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Synthetic dataset generator configuration
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to do with a raw record that cannot become an event
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRecordPolicy {
    /// Drop the record, remember why, and keep going
    #[default]
    Skip,
    /// Fail the whole run on the first bad record
    Abort,
}

/// Analysis configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Policy for malformed records
    #[serde(default)]
    pub invalid_records: InvalidRecordPolicy,

    /// How many hours the peak-hour rankings report
    #[serde(default = "default_peak_hours_limit")]
    pub peak_hours_limit: usize,

    /// Trailing window for the commitment score, in days
    #[serde(default = "default_commitment_window_days")]
    pub commitment_window_days: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            invalid_records: InvalidRecordPolicy::default(),
            peak_hours_limit: default_peak_hours_limit(),
            commitment_window_days: default_commitment_window_days(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.peak_hours_limit == 0 {
            return Err(Error::Config(
                "analysis.peak_hours_limit must be at least 1".to_string(),
            ));
        }
        if self.commitment_window_days == 0 {
            return Err(Error::Config(
                "analysis.commitment_window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_peak_hours_limit() -> usize {
    3
}

fn default_commitment_window_days() -> u32 {
    30
}

/// Synthetic dataset generator configuration
///
/// `feeling_weights` drives which feeling each event gets; `relapse_bias`
/// is the probability that an event with that feeling is a relapse.
#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    /// Number of events to generate
    #[serde(default = "default_dataset_size")]
    pub dataset_size: usize,

    /// Events are spread over this many days before "now"
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Relative weight of each feeling
    #[serde(default = "default_feeling_weights")]
    pub feeling_weights: BTreeMap<String, f64>,

    /// Relapse probability per feeling, in [0, 1]
    #[serde(default = "default_relapse_bias")]
    pub relapse_bias: BTreeMap<String, f64>,

    /// `user_id` written into the dataset envelope
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Static `meta.location_context` for every event
    #[serde(default = "default_location_context")]
    pub location_context: String,

    /// Fixed RNG seed for reproducible datasets
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dataset_size: default_dataset_size(),
            window_days: default_window_days(),
            feeling_weights: default_feeling_weights(),
            relapse_bias: default_relapse_bias(),
            user_id: default_user_id(),
            location_context: default_location_context(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.feeling_weights.is_empty() {
            return Err(Error::Config(
                "generator.feeling_weights must name at least one feeling".to_string(),
            ));
        }
        for (feeling, weight) in &self.feeling_weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::Config(format!(
                    "generator.feeling_weights.{} must be a non-negative number",
                    feeling
                )));
            }
            match self.relapse_bias.get(feeling) {
                None => {
                    return Err(Error::Config(format!(
                        "generator.relapse_bias has no entry for feeling '{}'",
                        feeling
                    )))
                }
                Some(bias) if !(0.0..=1.0).contains(bias) => {
                    return Err(Error::Config(format!(
                        "generator.relapse_bias.{} must be between 0 and 1",
                        feeling
                    )))
                }
                Some(_) => {}
            }
        }
        if self.feeling_weights.values().sum::<f64>() <= 0.0 {
            return Err(Error::Config(
                "generator.feeling_weights must not all be zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_dataset_size() -> usize {
    5000
}

fn default_window_days() -> u32 {
    30
}

fn default_feeling_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("bored".to_string(), 0.4),
        ("fatigued".to_string(), 0.3),
        ("neutral".to_string(), 0.3),
    ])
}

fn default_relapse_bias() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("fatigued".to_string(), 0.60),
        ("bored".to_string(), 0.30),
        ("neutral".to_string(), 0.20),
    ])
}

fn default_user_id() -> String {
    "synthetic_user_01".to_string()
}

fn default_location_context() -> String {
    "home".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.generator.validate()
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/urgelens/config.toml` (~/.config/urgelens/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("urgelens").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/urgelens/` (~/.local/state/urgelens/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("urgelens")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// For CLI binaries that want explicit, stable path behavior before
    /// invoking components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
