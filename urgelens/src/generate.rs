//! urgelens-generate - write a synthetic urge event dataset
//!
//! Feeling weights and relapse bias come from the `[generator]` config
//! section; size, seed and output path can be overridden on the command line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use urgelens_core::{generator, Config};

#[derive(Parser, Debug)]
#[command(name = "urgelens-generate")]
#[command(about = "Generate a synthetic urge event dataset")]
#[command(version)]
struct Args {
    /// Number of events (default: generator.dataset_size)
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// RNG seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,

    /// Output file
    #[arg(short, long, default_value = "synthetic_data.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard =
        urgelens_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let mut gen_config = config.generator.clone();
    if let Some(size) = args.size {
        gen_config.dataset_size = size;
    }
    if let Some(seed) = args.seed {
        gen_config.seed = Some(seed);
    }

    let dataset =
        generator::generate(&gen_config, Utc::now()).context("failed to generate dataset")?;
    generator::write_dataset(&args.output, &dataset)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Successfully generated {} events in '{}'",
        dataset.events.len(),
        args.output.display()
    );

    Ok(())
}
