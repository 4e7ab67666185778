//! labstats - Experiment Log Statistics Generator
//!
//! Reads the markdown experiment documents in the current directory,
//! computes aggregate statistics, and regenerates `Stats.md` plus the
//! three chart images under `images/`. Runs once and exits; takes no
//! arguments and reads no environment.
//!
//! Exit codes:
//!   0 - Success (including "no experiment records found")
//!   1 - Runtime error (unwritable output, chart backend failure, etc.)

mod analysis;
mod charts;
mod collector;
mod config;
mod extractor;
mod models;
mod report;

use anyhow::{Context, Result};
use config::Config;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    init_logging();

    let config = Config::default();
    info!("labstats v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&config) {
        error!("run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize compact stdout logging.
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete collect → aggregate → render pipeline.
fn run(config: &Config) -> Result<()> {
    println!("📊 Collecting experiment records...");
    let records = collector::collect_records(config)?;

    if records.is_empty() {
        println!("No experiment records found.");
        return Ok(());
    }
    println!("✓ {} experiments collected", records.len());

    println!("\nComputing statistics...");
    let stats = analysis::aggregate(&records);
    println!("✓ Success rate: {:.1}%", stats.success_rate);

    println!("\nRendering charts...");
    std::fs::create_dir_all(&config.images_dir).with_context(|| {
        format!(
            "failed to create images directory {}",
            config.images_dir.display()
        )
    })?;

    charts::render_timeline(&records, config)?;
    println!("✓ {}", config::TIMELINE_CHART);
    charts::render_model_comparison(&stats, config)?;
    println!("✓ {}", config::MODEL_CHART);
    charts::render_tag_frequency(&stats, config)?;
    println!("✓ {}", config::TAG_CHART);

    println!("\nWriting report...");
    report::save_report(&stats, config)?;
    println!("✓ {}", config.stats_file.display());

    println!("\nDone!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_without_records_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("README.md"), "not an experiment").unwrap();

        let config = Config {
            experiments_dir: dir.path().to_path_buf(),
            stats_file: dir.path().join("Stats.md"),
            images_dir: dir.path().join("images"),
            ..Config::default()
        };

        run(&config).unwrap();
        assert!(!config.stats_file.exists());
        assert!(!config.images_dir.exists());
    }
}
