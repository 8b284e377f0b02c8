// src/main.rs

use anyhow::{Context, Result};
use scenario_classifier::catalogue::scenario_catalogue;
use scenario_classifier::pipeline::{BatchOptions, BatchReport, BatchRunner};
use scenario_classifier::scenario::loader::load_segments;
use scenario_classifier::types::Config;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config_path =
        std::env::var("SCENARIO_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let config = Config::load(&config_path)?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("scenario_classifier={}", config.logging.level))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚦 Scenario Classifier Starting");
    info!("✓ Configuration loaded from {}", config_path);

    let th = &config.thresholds;
    info!(
        "Thresholds: behind={:.1}m, beside={:.1}m, overtake_speed={:.1}m/s, prevalence={:.2}",
        th.behind_offset, th.beside_offset, th.min_overtake_speed, th.prevalence
    );

    let catalogue = scenario_catalogue(th).context("Builtin catalogue is malformed")?;

    let available = catalogue.projection_names();
    let ignore = config
        .projections
        .ignore_list(available.iter().map(String::as_str));
    if !ignore.is_empty() {
        info!("Skipping projection(s): {}", ignore.join(", "));
    }

    let projections = catalogue
        .build_projections(&ignore)
        .context("Failed to build projections")?;
    if projections.is_empty() {
        warn!("No projections left after filtering; nothing to do");
        return Ok(());
    }

    let segments = load_segments(Path::new(&config.segments.input_dir));
    if segments.is_empty() {
        error!("No segments found in {}", config.segments.input_dir);
        return Ok(());
    }

    let options = BatchOptions {
        max_missing_listed: config.output.max_missing_listed,
        ..BatchOptions::from(&config.segments)
    };
    let runner = BatchRunner::new(projections, options);
    let report = runner.run(&segments).context("Batch aborted")?;

    report.log_summary();
    write_report(&report, Path::new(&config.output.report_path))?;
    info!("💾 Report written to {}", config.output.report_path);

    Ok(())
}

fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(())
}
