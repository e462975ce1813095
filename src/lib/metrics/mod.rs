//! Metrics collection and reporting.
//!
//! - [`dedup`] - Per-file deduplication metrics
//! - [`writer`] - Metrics file I/O utilities

pub mod dedup;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use dedup::DedupMetrics;
pub use writer::{write_metrics, write_metrics_auto};

/// Number of decimal places used for percentage metrics.
pub const PERCENT_PRECISION: usize = 2;

/// Placeholder written for a value that is undefined, e.g. a percentage of zero pairs.
pub const NOT_AVAILABLE: &str = "NA";

/// A metric type that can be serialized to TSV files.
pub trait Metric: Serialize + for<'de> Deserialize<'de> + Clone + Default {
    /// Human-readable name for this metric type, used in error messages.
    fn metric_name() -> &'static str;
}

/// Formats a percentage with [`PERCENT_PRECISION`] decimals, or [`NOT_AVAILABLE`].
///
/// # Example
/// ```
/// use seqdedup_lib::metrics::format_percentage;
/// assert_eq!(format_percentage(Some(50.0)), "50.00");
/// assert_eq!(format_percentage(Some(100.0 / 3.0)), "33.33");
/// assert_eq!(format_percentage(None), "NA");
/// ```
#[must_use]
pub fn format_percentage(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.PERCENT_PRECISION$}"))
}

/// Formats a count with thousands separators.
///
/// # Example
/// ```
/// use seqdedup_lib::metrics::format_count;
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
