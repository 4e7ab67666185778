//! Experiment document collection.
//!
//! Enumerates the experiment documents under a root directory and runs
//! each through the extractor. A file that cannot be read is logged and
//! skipped; collection itself never fails on bad input, and an empty
//! result simply means "no experiments".

use crate::config::Config;
use crate::extractor;
use crate::models::ExperimentRecord;
use anyhow::Result;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect all experiment records under `config.experiments_dir`.
///
/// Documents are visited in lexicographic filename order, which is the
/// order the returned records keep. A missing directory yields an empty
/// list rather than an error.
pub fn collect_records(config: &Config) -> Result<Vec<ExperimentRecord>> {
    let mut records = Vec::new();

    let walker = WalkDir::new(&config.experiments_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !is_experiment_file(&name) {
            continue;
        }

        match extractor::read_record(entry.path()) {
            Ok(record) => {
                debug!(
                    "parsed {}: {}",
                    name,
                    serde_json::to_string(&record).unwrap_or_default()
                );
                records.push(record);
            }
            Err(e) => {
                warn!("skipping {}: {}", name, e);
            }
        }
    }

    Ok(records)
}

/// Experiment documents are markdown files whose name starts with a digit
/// (e.g. `001.md`, `20250314-retry.md`).
fn is_experiment_file(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_digit())
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}
