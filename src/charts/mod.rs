//! Chart rendering.
//!
//! Three independent PNG renderers over the plotters bitmap backend:
//! rating timeline, per-model success rate, and tag frequency. Each one
//! silently skips when it has nothing to draw, so a thin data set never
//! fails the run. The images directory must exist before rendering.

use crate::config::{Config, TimelineVariant, MODEL_CHART, TAG_CHART, TIMELINE_CHART};
use crate::models::{AggregateStats, ExperimentRecord, ModelBreakdown, Rating};
use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

const CHART_SIZE: (u32, u32) = (1000, 600);
const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const CORAL: RGBColor = RGBColor(255, 127, 80);

/// Plot the rating timeline in chronological order.
///
/// Depending on `config.timeline` this is either the ordinal score per
/// record (unrated records plot at 0) or the running cumulative success
/// percentage. No-op when there are no records.
pub fn render_timeline(records: &[ExperimentRecord], config: &Config) -> Result<()> {
    if records.is_empty() {
        debug!("no records, skipping timeline chart");
        return Ok(());
    }

    let ordered = chronological(records);
    let ids: Vec<&str> = ordered.iter().map(|r| r.id.as_str()).collect();
    let (values, y_range, y_desc) = match config.timeline {
        TimelineVariant::OrdinalRating => (ordinal_scores(&ordered), 0.0..4.5, "Rating"),
        TimelineVariant::CumulativeSuccess => {
            (cumulative_success(&ordered), 0.0..100.0, "Success Rate (%)")
        }
    };

    let path = config.chart_path(TIMELINE_CHART);
    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let caption = match config.timeline {
        TimelineVariant::OrdinalRating => "Experiment Rating Timeline",
        TimelineVariant::CumulativeSuccess => "Cumulative Success Rate Over Time",
    };
    let x_max = ordered.len() as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5f64..x_max, y_range)?;

    let ordinal = config.timeline == TimelineVariant::OrdinalRating;
    chart
        .configure_mesh()
        .x_desc("Experiment")
        .y_desc(y_desc)
        .x_labels(ids.len().min(20))
        .y_labels(5)
        .x_label_formatter(&|x| index_label(*x, &ids))
        .y_label_formatter(&|y| {
            if ordinal {
                ordinal_axis_label(*y)
            } else {
                format!("{y:.0}")
            }
        })
        .draw()?;

    chart.draw_series(LineSeries::new(
        values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
        STEEL_BLUE.stroke_width(2),
    ))?;
    chart.draw_series(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Circle::new((i as f64, *v), 4, STEEL_BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// One vertical bar per model with enough samples, height = success
/// rate, annotated with the exact value. No-op when no model qualifies.
pub fn render_model_comparison(stats: &AggregateStats, config: &Config) -> Result<()> {
    let included: Vec<(&str, &ModelBreakdown)> = stats
        .models
        .iter()
        .filter(|(_, b)| b.total >= config.min_model_samples)
        .map(|(name, b)| (name.as_str(), b))
        .collect();
    if included.is_empty() {
        debug!("no models with enough samples, skipping comparison chart");
        return Ok(());
    }

    let path = config.chart_path(MODEL_CHART);
    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = included.iter().map(|(n, _)| *n).collect();
    let x_max = included.len() as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .caption("Model Comparison - Success Rate", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..x_max, 0.0f64..105.0)?;

    chart
        .configure_mesh()
        .x_desc("Model")
        .y_desc("Success Rate (%)")
        .x_labels(names.len())
        .x_label_formatter(&|x| index_label(*x, &names))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .draw()?;

    chart.draw_series(included.iter().enumerate().map(|(i, (_, breakdown))| {
        let x = i as f64;
        Rectangle::new(
            [(x - 0.3, 0.0), (x + 0.3, breakdown.success_rate())],
            STEEL_BLUE.filled(),
        )
    }))?;

    let label_style = ("sans-serif", 16)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for (i, (_, breakdown)) in included.iter().enumerate() {
        let rate = breakdown.success_rate();
        chart.plotting_area().draw(&Text::new(
            format!("{rate:.1}%"),
            (i as f64, rate + 1.0),
            label_style.clone(),
        ))?;
    }

    root.present()?;
    Ok(())
}

/// One horizontal bar per distinct tag, length = occurrence count,
/// annotated with the exact count. No-op when there are no tags.
pub fn render_tag_frequency(stats: &AggregateStats, config: &Config) -> Result<()> {
    if stats.tags.is_empty() {
        debug!("no tags, skipping frequency chart");
        return Ok(());
    }

    let names: Vec<&str> = stats.tags.keys().map(String::as_str).collect();
    let counts: Vec<usize> = stats.tags.values().map(|e| e.count).collect();
    let max_count = counts.iter().copied().max().unwrap_or(1) as f64;

    let path = config.chart_path(TAG_CHART);
    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = names.len() as f64 - 0.5;
    let mut chart = ChartBuilder::on(&root)
        .caption("Tag Frequency", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(130)
        .build_cartesian_2d(0.0f64..max_count * 1.15, -0.5f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Frequency")
        .y_desc("Tag")
        .y_labels(names.len())
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| index_label(*y, &names))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, count)| {
        let y = i as f64;
        Rectangle::new(
            [(0.0, y - 0.35), (*count as f64, y + 0.35)],
            CORAL.filled(),
        )
    }))?;

    let label_style = ("sans-serif", 16)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (i, count) in counts.iter().enumerate() {
        chart.plotting_area().draw(&Text::new(
            format!(" {count}"),
            (*count as f64, i as f64),
            label_style.clone(),
        ))?;
    }

    root.present()?;
    Ok(())
}

/// Records sorted by their date string; absent dates sort first.
/// ISO-style dates make lexicographic order chronological.
fn chronological(records: &[ExperimentRecord]) -> Vec<&ExperimentRecord> {
    let mut ordered: Vec<&ExperimentRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.date.clone().unwrap_or_default());
    ordered
}

/// Ordinal rating score per record; unrated records score 0.
fn ordinal_scores(ordered: &[&ExperimentRecord]) -> Vec<f64> {
    ordered
        .iter()
        .map(|r| r.rating.map_or(0.0, |rating| f64::from(rating.score())))
        .collect()
}

/// Running success percentage after each record.
fn cumulative_success(ordered: &[&ExperimentRecord]) -> Vec<f64> {
    let mut successes = 0usize;
    ordered
        .iter()
        .enumerate()
        .map(|(i, r)| {
            if r.rating.is_some_and(|rating| rating.is_success()) {
                successes += 1;
            }
            crate::analysis::percentage(successes, i + 1)
        })
        .collect()
}

/// Axis label for a float tick over an index-based axis. Ticks that do
/// not land on an index render empty.
fn index_label(x: f64, names: &[&str]) -> String {
    let i = x.round();
    if (x - i).abs() > 0.25 || i < 0.0 {
        return String::new();
    }
    names.get(i as usize).map(|s| s.to_string()).unwrap_or_default()
}

/// Axis label for the ordinal rating scale.
fn ordinal_axis_label(y: f64) -> String {
    let i = y.round();
    if (y - i).abs() > 0.25 {
        return String::new();
    }
    match i as i64 {
        1 => Rating::Failed.label().to_string(),
        2 => Rating::Below.label().to_string(),
        3 => Rating::Met.label().to_string(),
        4 => Rating::Exceeded.label().to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    fn record(id: &str, date: Option<&str>, rating: Option<Rating>) -> ExperimentRecord {
        ExperimentRecord {
            id: id.to_string(),
            date: date.map(String::from),
            rating,
            ..ExperimentRecord::default()
        }
    }

    #[test]
    fn test_chronological_order() {
        let records = vec![
            record("b", Some("2025-02-01"), None),
            record("a", Some("2025-01-15"), None),
            record("undated", None, None),
        ];
        let ordered = chronological(&records);
        let ids: Vec<&str> = ordered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["undated", "a", "b"]);
    }

    #[test]
    fn test_ordinal_scores_with_unrated() {
        let records = vec![
            record("1", None, Some(Rating::Exceeded)),
            record("2", None, None),
            record("3", None, Some(Rating::Failed)),
        ];
        let ordered = chronological(&records);
        assert_eq!(ordinal_scores(&ordered), vec![4.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cumulative_success_series() {
        let records = vec![
            record("1", Some("2025-01-01"), Some(Rating::Met)),
            record("2", Some("2025-01-02"), Some(Rating::Failed)),
            record("3", Some("2025-01-03"), Some(Rating::Exceeded)),
            record("4", Some("2025-01-04"), None),
        ];
        let ordered = chronological(&records);
        let series = cumulative_success(&ordered);
        assert_eq!(series.len(), 4);
        assert_eq!(series[0], 100.0);
        assert_eq!(series[1], 50.0);
        assert!((series[2] - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(series[3], 50.0);
    }

    #[test]
    fn test_index_label() {
        let names = vec!["alpha", "beta"];
        assert_eq!(index_label(0.0, &names), "alpha");
        assert_eq!(index_label(1.1, &names), "beta");
        assert_eq!(index_label(0.5, &names), "");
        assert_eq!(index_label(-1.0, &names), "");
        assert_eq!(index_label(5.0, &names), "");
    }

    #[test]
    fn test_renderers_skip_empty_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            images_dir: dir.path().join("images"),
            ..Config::default()
        };

        // The images directory does not even exist; skipping must not touch it.
        render_timeline(&[], &config).unwrap();
        render_model_comparison(&AggregateStats::default(), &config).unwrap();
        render_tag_frequency(&AggregateStats::default(), &config).unwrap();
        assert!(!config.images_dir.exists());
    }

    #[test]
    fn test_model_comparison_threshold_skips() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            images_dir: dir.path().to_path_buf(),
            min_model_samples: 2,
            ..Config::default()
        };

        let records = vec![ExperimentRecord {
            id: "001".into(),
            model: Some("solo".into()),
            rating: Some(Rating::Met),
            ..ExperimentRecord::default()
        }];
        let stats = crate::analysis::aggregate(&records);

        render_model_comparison(&stats, &config).unwrap();
        assert!(!config.chart_path(MODEL_CHART).exists());
    }
}
