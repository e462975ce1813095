//! Formatting helpers and summaries for log output.

use std::time::{Duration, Instant};

use crate::dedup::RunCounters;
use crate::metrics::{format_count, format_percentage};

/// Formats a duration as e.g. "45s", "2m 15s" or "1h 30m".
///
/// # Examples
///
/// ```
/// use seqdedup_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let (mins, rem) = (secs / 60, secs % 60);
        if rem == 0 { format!("{mins}m") } else { format!("{mins}m {rem}s") }
    } else {
        let (hours, mins) = (secs / 3600, (secs % 3600) / 60);
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a processing rate, switching to per-minute below one item per second.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} pairs/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} pairs/s", format_count(rate as u64))
    } else {
        format!("{:.1} pairs/min", count as f64 / (secs / 60.0))
    }
}

/// Logs the outcome of deduplicating one file.
pub fn log_dedup_summary(file_name: &str, counters: &RunCounters) {
    log::info!("Deduplication summary for {file_name}:");
    log::info!("  Total pairs: {}", format_count(counters.total));
    log::info!(
        "  Removed pairs: {} ({}%)",
        format_count(counters.removed),
        format_percentage(counters.removed_pct())
    );
    log::info!(
        "  Retained pairs: {} ({}%)",
        format_count(counters.retained()),
        format_percentage(counters.retained_pct())
    );
}

/// Times an operation and logs its start and completion.
///
/// ```no_run
/// use seqdedup_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Deduplicating sample.sam");
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs completion with the number of pairs and the rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} pairs in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
