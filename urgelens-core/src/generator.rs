//! Synthetic dataset generator
//!
//! Produces plausible urge-event datasets for fixtures and demos. Feelings
//! are drawn from a weighted table and each feeling carries its own relapse
//! probability, so generated data has a known bias the analysis should
//! recover.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::ingest::schema::{format_timestamp, RawDataset, RawEvent, RawMeta, RawStreak, RawUrge};

const MAX_CURRENT_STREAK_DAYS: u32 = 50;
const MAX_LONGEST_STREAK_DAYS: u32 = 100;

/// Intensity is drawn around this mean with unit spread.
const INTENSITY_MEAN: f64 = 3.0;
const INTENSITY_STD_DEV: f64 = 1.0;

/// Generate a dataset relative to `now`.
///
/// Uses `config.seed` when set, so the same config and `now` always give the
/// same dataset.
pub fn generate(config: &GeneratorConfig, now: DateTime<Utc>) -> Result<RawDataset> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_with_rng(config, now, &mut rng)
}

/// Generate a dataset from a caller-supplied RNG.
pub fn generate_with_rng<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<RawDataset> {
    config.validate()?;

    let feelings: Vec<&String> = config.feeling_weights.keys().collect();
    let picker = WeightedIndex::new(config.feeling_weights.values())
        .map_err(|e| Error::Generator(format!("invalid feeling weights: {}", e)))?;
    let intensity = Normal::new(INTENSITY_MEAN, INTENSITY_STD_DEV)
        .map_err(|e| Error::Generator(format!("invalid intensity distribution: {}", e)))?;

    let events = (1..=config.dataset_size)
        .map(|i| {
            let feeling = feelings[picker.sample(rng)];
            let bias = config.relapse_bias.get(feeling).copied().unwrap_or(0.0);
            sample_event(i, feeling, bias, &intensity, config, now, rng)
        })
        .collect();

    tracing::info!(
        events = config.dataset_size,
        seeded = config.seed.is_some(),
        "Synthetic dataset generated"
    );

    Ok(RawDataset {
        user_id: Some(config.user_id.clone()),
        events,
    })
}

fn sample_event<R: Rng + ?Sized>(
    index: usize,
    feeling: &str,
    relapse_bias: f64,
    intensity: &Normal<f64>,
    config: &GeneratorConfig,
    now: DateTime<Utc>,
    rng: &mut R,
) -> RawEvent {
    let days_ago = rng.gen_range(0..=i64::from(config.window_days));
    let hours_ago = rng.gen_range(0..=23);
    let timestamp = now - Duration::days(days_ago) - Duration::hours(hours_ago);

    let relapsed = rng.gen::<f64>() < relapse_bias;
    let outcome = if relapsed { "relapsed" } else { "resisted" };

    let current_streak = if relapsed {
        0
    } else {
        rng.gen_range(1..=MAX_CURRENT_STREAK_DAYS)
    };
    let longest_streak = rng.gen_range(current_streak..=MAX_LONGEST_STREAK_DAYS);

    RawEvent {
        event_id: Some(index.to_string()),
        timestamp: Some(format_timestamp(timestamp)),
        urge: RawUrge {
            outcome: Some(outcome.to_string()),
            feeling: Some(feeling.to_string()),
            intensity: Some(sample_intensity(intensity, rng)),
        },
        streak: RawStreak {
            current_streak_days: Some(current_streak),
            longest_streak_days: Some(longest_streak),
        },
        meta: RawMeta {
            location_context: Some(config.location_context.clone()),
        },
    }
}

/// Truncate a normal draw and clamp it to 1..=5.
fn sample_intensity<R: Rng + ?Sized>(intensity: &Normal<f64>, rng: &mut R) -> u8 {
    intensity.sample(rng).trunc().clamp(1.0, 5.0) as u8
}

/// Write a dataset as pretty-printed JSON.
pub fn write_dataset(path: &Path, dataset: &RawDataset) -> Result<()> {
    let json = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), events = dataset.events.len(), "Dataset written");
    Ok(())
}
