//! urgelens-analyze - derive recovery insights from an urge event dataset
//!
//! Loads a dataset file, runs the insight engine and prints the report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use urgelens_core::config::InvalidRecordPolicy;
use urgelens_core::format::{hour_display, optional_display, pct_display};
use urgelens_core::{ingest, Config, InsightEngine, InsightsReport, LoadedDataset};

#[derive(Parser, Debug)]
#[command(name = "urgelens-analyze")]
#[command(about = "Derive recovery insights from an urge event dataset")]
#[command(version)]
struct Args {
    /// Dataset file (JSON with an `events` array, or a bare array)
    #[arg(default_value = "synthetic_data.json")]
    input: PathBuf,

    /// Output format: text (default), md, or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Fail on the first invalid record instead of skipping it
    #[arg(long)]
    strict: bool,

    /// List skipped records
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let mut config = Config::load().context("failed to load configuration")?;
    if args.strict {
        config.analysis.invalid_records = InvalidRecordPolicy::Abort;
    }

    // Initialize logging
    let _log_guard =
        urgelens_core::logging::init(&config.logging).context("failed to initialize logging")?;

    if !matches!(args.format.as_str(), "text" | "md" | "json") {
        anyhow::bail!("Unknown format: {}. Use 'text', 'md' or 'json'", args.format);
    }

    let dataset = ingest::load_path(&args.input, config.analysis.invalid_records)
        .with_context(|| format!("failed to load dataset {}", args.input.display()))?;

    tracing::info!(
        path = %args.input.display(),
        records = dataset.total_records(),
        events = dataset.events.len(),
        skipped = dataset.skipped.len(),
        "Analyzing dataset"
    );

    let report = InsightEngine::new(config.analysis.clone()).analyze_dataset(&dataset);

    match args.format.as_str() {
        "json" => print_json(&report)?,
        "md" => print_markdown(&report),
        _ => print_text(&report, &dataset, args.verbose),
    }

    Ok(())
}

fn print_text(report: &InsightsReport, dataset: &LoadedDataset, verbose: bool) {
    let title = match &dataset.user_id {
        Some(user) => format!("Recovery insights for {}", user),
        None => "Recovery insights".to_string(),
    };

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    println!(
        "   Events analyzed: {}   Skipped records: {}",
        report.summary.total_events, report.summary.skipped_records
    );
    if verbose {
        for skipped in &dataset.skipped {
            println!(
                "     - #{} {}: {}",
                skipped.index,
                skipped.id.as_deref().unwrap_or("(no id)"),
                skipped.reason
            );
        }
    }
    println!();

    if report.summary.total_events == 0 {
        println!("  No events to analyze.");
        println!();
        return;
    }

    println!("OUTCOMES");
    if let Some(rates) = &report.event_level.urge_outcome_rate {
        println!(
            "   Resisted: {:<12} Relapsed: {}",
            pct_display(rates.resisted_pct),
            pct_display(rates.relapsed_pct)
        );
    }
    println!();

    if !report.event_level.feeling_to_outcome_correlation.is_empty() {
        println!("FEELINGS");
        println!("   {:<14} {:>10} {:>10}", "feeling", "relapse", "strength");
        for (feeling, pct) in &report.event_level.feeling_to_outcome_correlation {
            let strength = report
                .event_level
                .feeling_strength_index
                .get(feeling)
                .copied()
                .flatten()
                .map(|s| format!("{:.2}x", s));
            println!(
                "   {:<14} {:>10} {:>10}",
                feeling,
                pct_display(*pct),
                optional_display(strength)
            );
        }
        println!(
            "   Most vulnerable: {}   Most protective: {}",
            optional_display(report.feeling_dynamics.most_vulnerable_feeling.as_deref()),
            optional_display(report.feeling_dynamics.most_protective_feeling.as_deref())
        );
        println!();
    }

    println!("TIME PATTERNS");
    println!(
        "   Peak relapse hours:    {}",
        hours_list(&report.time_based.peak_relapse_hours)
    );
    println!(
        "   Peak resistance hours: {}",
        hours_list(&report.time_based.peak_resistance_hours)
    );
    for day in &report.time_based.relapse_by_day_of_week {
        println!("   {:<10} {:>8} relapse", day.day, pct_display(day.pct));
    }
    println!();

    println!("PROGRESS BY MONTH");
    for (month, pct) in &report.time_based.recovery_progress_over_time_pct {
        println!("   {}  {:>8} resisted", month, pct_display(*pct));
    }
    println!();

    println!("COMMITMENT");
    println!(
        "   Rolling score:        {}",
        pct_display(report.commitment.commitment_score_rolling_30d_avg)
    );
    println!(
        "   Avg time to relapse:  {}",
        optional_display(
            report
                .commitment
                .avg_time_to_relapse_hours
                .map(|h| format!("{:.1}h", h))
        )
    );
    println!();

    if let Some(profile) = &report.user_feedback_loops.personalized_risk_profile {
        println!("RISK PROFILE");
        println!("   {}", profile.message());
        println!();
    }
}

fn print_markdown(report: &InsightsReport) {
    println!("# Recovery Insights");
    println!();

    if report.summary.total_events == 0 {
        println!("*No events to analyze.*");
        return;
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Events | {} |", report.summary.total_events);
    println!("| Skipped records | {} |", report.summary.skipped_records);
    if let Some(rates) = &report.event_level.urge_outcome_rate {
        println!("| Resisted | {} |", pct_display(rates.resisted_pct));
        println!("| Relapsed | {} |", pct_display(rates.relapsed_pct));
    }
    println!(
        "| Commitment score | {} |",
        pct_display(report.commitment.commitment_score_rolling_30d_avg)
    );
    println!(
        "| Avg time to relapse | {} |",
        optional_display(
            report
                .commitment
                .avg_time_to_relapse_hours
                .map(|h| format!("{:.1}h", h))
        )
    );
    println!();

    println!("## Feelings");
    println!();
    println!("| Feeling | Relapse rate | Strength index |");
    println!("|---------|--------------|----------------|");
    for (feeling, pct) in &report.event_level.feeling_to_outcome_correlation {
        let strength = report
            .event_level
            .feeling_strength_index
            .get(feeling)
            .copied()
            .flatten()
            .map(|s| format!("{:.2}", s));
        println!(
            "| {} | {} | {} |",
            feeling,
            pct_display(*pct),
            optional_display(strength)
        );
    }
    println!();

    println!("## Time Patterns");
    println!();
    println!(
        "- **Peak relapse hours:** {}",
        hours_list(&report.time_based.peak_relapse_hours)
    );
    println!(
        "- **Peak resistance hours:** {}",
        hours_list(&report.time_based.peak_resistance_hours)
    );
    for day in &report.time_based.relapse_by_day_of_week {
        println!("- **{}:** {} relapse", day.day, pct_display(day.pct));
    }
    println!();

    if let Some(profile) = &report.user_feedback_loops.personalized_risk_profile {
        println!("## Risk Profile");
        println!();
        println!("*{}*", profile.message());
        println!();
    }

    println!("---");
    println!("*Generated by urgelens-analyze*");
}

fn print_json(report: &InsightsReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn hours_list(hours: &[u32]) -> String {
    if hours.is_empty() {
        return "n/a".to_string();
    }
    hours
        .iter()
        .map(|h| hour_display(*h))
        .collect::<Vec<_>>()
        .join(", ")
}
