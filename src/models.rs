//! Data models for the experiment statistics generator.
//!
//! This module contains all the core data structures used throughout
//! the application for representing records, ratings, and aggregates.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket name used when a record has no model or no rating.
pub const UNKNOWN: &str = "unknown";

/// Outcome rating of a single experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Exceeded expectations (◎)
    Exceeded,
    /// Met expectations (○)
    Met,
    /// Below expectations (△)
    Below,
    /// Failed (❌)
    Failed,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl Rating {
    /// Fixed display order for report tables and chart legends.
    pub const DISPLAY_ORDER: [Rating; 4] =
        [Rating::Exceeded, Rating::Met, Rating::Below, Rating::Failed];

    /// Parse a rating glyph. The legacy full-width circle `〇` is accepted
    /// and normalized to the canonical `○`.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph {
            "◎" => Some(Rating::Exceeded),
            "○" | "〇" => Some(Rating::Met),
            "△" => Some(Rating::Below),
            "❌" => Some(Rating::Failed),
            _ => None,
        }
    }

    /// Canonical glyph for this rating.
    pub fn glyph(&self) -> &'static str {
        match self {
            Rating::Exceeded => "◎",
            Rating::Met => "○",
            Rating::Below => "△",
            Rating::Failed => "❌",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Exceeded => "Exceeded expectations",
            Rating::Met => "Met expectations",
            Rating::Below => "Below expectations",
            Rating::Failed => "Failed",
        }
    }

    /// Ordinal score used by the timeline chart (failed=1 .. exceeded=4).
    pub fn score(&self) -> u32 {
        match self {
            Rating::Failed => 1,
            Rating::Below => 2,
            Rating::Met => 3,
            Rating::Exceeded => 4,
        }
    }

    /// Whether this rating counts toward the success rate.
    pub fn is_success(&self) -> bool {
        matches!(self, Rating::Exceeded | Rating::Met)
    }
}

/// One parsed experiment document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Record identifier; filename stem unless overridden by the title line.
    pub id: String,
    /// Free-form date string (ISO-style dates sort chronologically).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Who recorded the experiment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder: Option<String>,
    /// Model under test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// What the experiment targeted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Outcome rating, if the document carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Tags in document order; duplicates are kept.
    pub tags: Vec<String>,
}

impl ExperimentRecord {
    /// Create an empty record carrying only the filename-derived id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Tally of records per rating, with an extra bucket for absent ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
    pub exceeded: usize,
    pub met: usize,
    pub below: usize,
    pub failed: usize,
    /// Records with no rating at all.
    pub unknown: usize,
}

impl RatingCounts {
    /// Count one record's rating (or its absence).
    pub fn bump(&mut self, rating: Option<Rating>) {
        match rating {
            Some(Rating::Exceeded) => self.exceeded += 1,
            Some(Rating::Met) => self.met += 1,
            Some(Rating::Below) => self.below += 1,
            Some(Rating::Failed) => self.failed += 1,
            None => self.unknown += 1,
        }
    }

    /// Count for one canonical rating.
    pub fn get(&self, rating: Rating) -> usize {
        match rating {
            Rating::Exceeded => self.exceeded,
            Rating::Met => self.met,
            Rating::Below => self.below,
            Rating::Failed => self.failed,
        }
    }

    /// Number of successful records (exceeded or met).
    pub fn success(&self) -> usize {
        self.exceeded + self.met
    }

    /// Sum over all buckets, including unknown. Always equals the number
    /// of records tallied.
    pub fn total(&self) -> usize {
        self.exceeded + self.met + self.below + self.failed + self.unknown
    }
}

/// Per-model slice of the aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelBreakdown {
    /// Number of records for this model.
    pub total: usize,
    /// Rating tally within this model.
    pub ratings: RatingCounts,
}

impl ModelBreakdown {
    /// Success rate for this model, in percent. 0.0 when the model has
    /// no records.
    pub fn success_rate(&self) -> f64 {
        crate::analysis::percentage(self.ratings.success(), self.total)
    }
}

/// Occurrence count and back-references for one tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagEntry {
    /// Total occurrences across all records, repeats included.
    pub count: usize,
    /// Ids of the records carrying this tag, in collection order; one
    /// entry per occurrence, never deduplicated.
    pub records: Vec<String>,
}

/// Summary statistics derived from the full record list.
///
/// Rebuilt from scratch on every run and never mutated after
/// construction; the renderers only read it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Total number of records.
    pub total: usize,
    /// Percentage of records rated ◎ or ○; exactly 0.0 when total is 0.
    pub success_rate: f64,
    /// Global rating tally.
    pub ratings: RatingCounts,
    /// Per-model breakdown, keyed by model name ("unknown" for absent),
    /// in first-encountered order.
    pub models: IndexMap<String, ModelBreakdown>,
    /// Per-tag counts and back-references, in first-encountered order.
    pub tags: IndexMap<String, TagEntry>,
}
