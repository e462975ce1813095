//! Per-file deduplication metrics.

use serde::{Deserialize, Serialize};

use super::{Metric, format_percentage};
use crate::dedup::RunCounters;

/// One row of the `dedup_metrics.txt` file written next to each deduplicated output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupMetrics {
    /// Name of the input file
    pub file_name: String,
    /// Mate pairs examined
    pub total_pairs: u64,
    /// Mate pairs dropped as duplicates
    pub removed_pairs: u64,
    /// `removed_pairs` as a percentage of `total_pairs`, or `NA` for empty inputs
    pub removed_pct: String,
    /// Mate pairs written to the output
    pub retained_pairs: u64,
    /// `retained_pairs` as a percentage of `total_pairs`, or `NA` for empty inputs
    pub retained_pct: String,
}

impl DedupMetrics {
    #[must_use]
    pub fn from_counters(file_name: impl Into<String>, counters: &RunCounters) -> Self {
        Self {
            file_name: file_name.into(),
            total_pairs: counters.total,
            removed_pairs: counters.removed,
            removed_pct: format_percentage(counters.removed_pct()),
            retained_pairs: counters.retained(),
            retained_pct: format_percentage(counters.retained_pct()),
        }
    }
}

impl Metric for DedupMetrics {
    fn metric_name() -> &'static str {
        "deduplication"
    }
}
