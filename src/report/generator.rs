//! Markdown report generation.
//!
//! Serializes [`AggregateStats`] into the statistics document: a summary
//! block, the rating / model / tag tables, and references to the chart
//! images. The output file is rendered completely in memory and written
//! in one step, so a partial report is never left on disk.

use crate::config::{Config, MODEL_CHART, TAG_CHART, TIMELINE_CHART};
use crate::models::{AggregateStats, Rating, TagEntry};
use crate::analysis::percentage;
use anyhow::{Context, Result};

/// Render the full statistics document.
pub fn render_report(stats: &AggregateStats, config: &Config) -> String {
    let mut output = String::new();

    output.push_str("# Experiment Statistics\n\n");
    output.push_str(&format!(
        "Last updated: {}\n\n---\n\n",
        chrono::Local::now().format("%Y-%m-%d")
    ));

    output.push_str(&render_summary_section(stats));
    output.push_str(&render_rating_section(stats));
    output.push_str(&render_model_section(stats));
    output.push_str(&render_tag_section(stats));
    output.push_str(&render_charts_section(config));
    output.push_str(&render_footer());

    output
}

/// Write the report to `config.stats_file`, replacing any previous one.
pub fn save_report(stats: &AggregateStats, config: &Config) -> Result<()> {
    let content = render_report(stats, config);
    std::fs::write(&config.stats_file, content)
        .with_context(|| format!("failed to write report to {}", config.stats_file.display()))?;
    Ok(())
}

fn render_summary_section(stats: &AggregateStats) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!("- **Total experiments:** {}\n", stats.total));
    section.push_str(&format!(
        "- **Success rate (○ or better):** {:.1}%\n\n",
        stats.success_rate
    ));

    section
}

/// Rating table: all four canonical ratings in fixed display order,
/// zero-count rows included.
fn render_rating_section(stats: &AggregateStats) -> String {
    let mut section = String::new();

    section.push_str("## Rating Breakdown\n\n");
    section.push_str("| Rating | Count | Share |\n");
    section.push_str("|--------|-------|-------|\n");

    for rating in Rating::DISPLAY_ORDER {
        let count = stats.ratings.get(rating);
        section.push_str(&format!(
            "| {} {} | {} | {:.1}% |\n",
            rating.glyph(),
            rating.label(),
            count,
            percentage(count, stats.total)
        ));
    }
    section.push('\n');

    section
}

fn render_model_section(stats: &AggregateStats) -> String {
    let mut section = String::new();

    section.push_str("## Model Breakdown\n\n");
    section.push_str("| Model | Experiments | ◎ | ○ | △ | ❌ | Success rate |\n");
    section.push_str("|-------|-------------|---|---|---|----|--------------|\n");

    for (model, breakdown) in &stats.models {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {:.1}% |\n",
            model,
            breakdown.total,
            breakdown.ratings.exceeded,
            breakdown.ratings.met,
            breakdown.ratings.below,
            breakdown.ratings.failed,
            breakdown.success_rate()
        ));
    }
    section.push('\n');

    section
}

/// Tag table, most frequent first; ties keep first-encountered order.
fn render_tag_section(stats: &AggregateStats) -> String {
    let mut section = String::new();

    section.push_str("## Tag Breakdown\n\n");
    section.push_str("| Tag | Count | Experiments |\n");
    section.push_str("|-----|-------|-------------|\n");

    for (tag, entry) in tags_by_frequency(stats) {
        let links: Vec<String> = entry.records.iter().map(|id| format!("[[{id}]]")).collect();
        section.push_str(&format!("| {} | {} | {} |\n", tag, entry.count, links.join(", ")));
    }
    section.push('\n');

    section
}

/// Tags ordered by descending count. The sort is stable, so equal counts
/// stay in the map's first-encountered order.
fn tags_by_frequency(stats: &AggregateStats) -> Vec<(&String, &TagEntry)> {
    let mut tags: Vec<_> = stats.tags.iter().collect();
    tags.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    tags
}

fn render_charts_section(config: &Config) -> String {
    let mut section = String::new();

    section.push_str("---\n\n## Charts\n\n");
    section.push_str("### Rating Timeline\n\n");
    section.push_str(&format!(
        "![Rating timeline]({})\n\n",
        config.chart_link(TIMELINE_CHART)
    ));
    section.push_str("### Model Comparison\n\n");
    section.push_str(&format!(
        "![Model comparison]({})\n\n",
        config.chart_link(MODEL_CHART)
    ));
    section.push_str("### Tag Frequency\n\n");
    section.push_str(&format!(
        "![Tag frequency]({})\n\n",
        config.chart_link(TAG_CHART)
    ));

    section
}

fn render_footer() -> String {
    "---\n\n*Auto-generated by `labstats`; manual edits will be overwritten.*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate;
    use crate::models::{ExperimentRecord, Rating};

    fn sample_stats() -> AggregateStats {
        let records = vec![
            ExperimentRecord {
                id: "001".into(),
                model: Some("quill-large".into()),
                rating: Some(Rating::Exceeded),
                tags: vec!["prompting".into(), "compression".into()],
                ..ExperimentRecord::default()
            },
            ExperimentRecord {
                id: "002".into(),
                model: Some("quill-large".into()),
                rating: Some(Rating::Failed),
                tags: vec!["prompting".into()],
                ..ExperimentRecord::default()
            },
        ];
        aggregate(&records)
    }

    #[test]
    fn test_report_contains_all_sections() {
        let report = render_report(&sample_stats(), &Config::default());

        assert!(report.contains("# Experiment Statistics"));
        assert!(report.contains("## Summary"));
        assert!(report.contains("## Rating Breakdown"));
        assert!(report.contains("## Model Breakdown"));
        assert!(report.contains("## Tag Breakdown"));
        assert!(report.contains("## Charts"));
        assert!(report.contains("./images/timeline.png"));
        assert!(report.contains("./images/model_comparison.png"));
        assert!(report.contains("./images/tag_frequency.png"));
    }

    #[test]
    fn test_zero_count_ratings_still_listed() {
        let report = render_report(&sample_stats(), &Config::default());
        // Neither ○ nor △ appear in the sample, but their rows must exist.
        assert!(report.contains("| ○ Met expectations | 0 | 0.0% |"));
        assert!(report.contains("| △ Below expectations | 0 | 0.0% |"));
    }

    #[test]
    fn test_model_row() {
        let report = render_report(&sample_stats(), &Config::default());
        assert!(report.contains("| quill-large | 2 | 1 | 0 | 0 | 1 | 50.0% |"));
    }

    #[test]
    fn test_tag_rows_sorted_by_frequency() {
        let stats = sample_stats();
        let tags = tags_by_frequency(&stats);
        assert_eq!(tags[0].0, "prompting");
        assert_eq!(tags[0].1.count, 2);
        assert_eq!(tags[1].0, "compression");

        let report = render_report(&stats, &Config::default());
        assert!(report.contains("| prompting | 2 | [[001]], [[002]] |"));
        assert!(report.contains("| compression | 1 | [[001]] |"));
    }

    #[test]
    fn test_empty_stats_render_without_panicking() {
        let report = render_report(&AggregateStats::default(), &Config::default());
        assert!(report.contains("- **Total experiments:** 0"));
        assert!(report.contains("- **Success rate (○ or better):** 0.0%"));
    }

    #[test]
    fn test_save_report_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            stats_file: dir.path().join("Stats.md"),
            ..Config::default()
        };

        std::fs::write(&config.stats_file, "stale content").unwrap();
        save_report(&sample_stats(), &config).unwrap();

        let written = std::fs::read_to_string(&config.stats_file).unwrap();
        assert!(written.starts_with("# Experiment Statistics"));
        assert!(!written.contains("stale content"));
    }
}
