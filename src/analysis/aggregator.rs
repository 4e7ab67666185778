//! Aggregation of experiment records into summary statistics.
//!
//! Pure functions: records in, [`AggregateStats`] out. No I/O, no side
//! effects, no state between runs.

use crate::models::{AggregateStats, ExperimentRecord, UNKNOWN};

/// `part` out of `whole`, in percent. Exactly 0.0 for a zero
/// denominator, so an empty record set never divides by zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Compute all summary statistics from the full record list.
///
/// Records are expected in collection (filename-sorted) order; that
/// order flows through to model keys and tag back-references.
pub fn aggregate(records: &[ExperimentRecord]) -> AggregateStats {
    let mut stats = AggregateStats {
        total: records.len(),
        ..AggregateStats::default()
    };

    for record in records {
        stats.ratings.bump(record.rating);

        let model = record.model.as_deref().unwrap_or(UNKNOWN);
        let breakdown = stats.models.entry(model.to_string()).or_default();
        breakdown.total += 1;
        breakdown.ratings.bump(record.rating);

        for tag in &record.tags {
            let entry = stats.tags.entry(tag.clone()).or_default();
            entry.count += 1;
            // One back-reference per occurrence, repeats included.
            entry.records.push(record.id.clone());
        }
    }

    stats.success_rate = percentage(stats.ratings.success(), stats.total);
    stats
}
