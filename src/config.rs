//! Run configuration.
//!
//! Fixed paths and chart-variant choices live here as an explicit struct
//! built once at startup and passed by reference into every component.
//! Nothing is read from flags, files, or the environment.

use std::path::PathBuf;

/// File name of the rating timeline chart.
pub const TIMELINE_CHART: &str = "timeline.png";
/// File name of the per-model success rate chart.
pub const MODEL_CHART: &str = "model_comparison.png";
/// File name of the tag frequency chart.
pub const TAG_CHART: &str = "tag_frequency.png";

/// Which quantity the timeline chart plots.
///
/// The two variants reflect two equally valid views of the same data;
/// both are kept and the choice is a configuration matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineVariant {
    /// Ordinal rating score per record (failed=1 .. exceeded=4).
    OrdinalRating,
    /// Running cumulative success percentage after each record.
    CumulativeSuccess,
}

/// Root configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the experiment documents.
    pub experiments_dir: PathBuf,
    /// Path of the generated report, overwritten in full on every run.
    pub stats_file: PathBuf,
    /// Directory the chart images are written to.
    pub images_dir: PathBuf,
    /// Timeline chart variant.
    pub timeline: TimelineVariant,
    /// Minimum number of records a model needs to appear in the model
    /// comparison chart. 1 includes every model; 2 hides one-off runs.
    pub min_model_samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            experiments_dir: PathBuf::from("."),
            stats_file: PathBuf::from("Stats.md"),
            images_dir: PathBuf::from("images"),
            timeline: TimelineVariant::OrdinalRating,
            min_model_samples: 1,
        }
    }
}

impl Config {
    /// Relative path of a chart image as referenced from the report.
    pub fn chart_link(&self, file_name: &str) -> String {
        format!("./{}/{}", self.images_dir.display(), file_name)
    }

    /// Full path of a chart image on disk.
    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.images_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stats_file, PathBuf::from("Stats.md"));
        assert_eq!(config.images_dir, PathBuf::from("images"));
        assert_eq!(config.timeline, TimelineVariant::OrdinalRating);
        assert_eq!(config.min_model_samples, 1);
    }

    #[test]
    fn test_chart_paths() {
        let config = Config::default();
        assert_eq!(config.chart_link(TIMELINE_CHART), "./images/timeline.png");
        assert_eq!(
            config.chart_path(MODEL_CHART),
            PathBuf::from("images/model_comparison.png")
        );
    }
}
