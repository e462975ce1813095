//! Progress logging at regular intervals.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of mate pairs between progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Logs a message each time the number of processed items crosses a multiple of the
/// interval.
///
/// # Example
/// ```
/// use seqdedup_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Processed mate pairs").with_interval(100);
/// for _ in 0..250 {
///     tracker.record(1);  // logs at 100 and 200
/// }
/// tracker.log_final();    // logs "Processed mate pairs 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: AtomicU64,
}

impl ProgressTracker {
    /// Creates a tracker with the default interval of [`DEFAULT_PROGRESS_INTERVAL`].
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: DEFAULT_PROGRESS_INTERVAL, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Sets the logging interval; zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds `additional` items, logging once per interval boundary crossed.
    pub fn record(&self, additional: u64) {
        if additional == 0 {
            return;
        }
        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;
        for milestone in (prev / self.interval + 1)..=(new_count / self.interval) {
            info!("{} {}", self.message, milestone * self.interval);
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Logs the final count unless it was just logged as an interval boundary.
    pub fn log_final(&self) {
        let count = self.count();
        if count > 0 && !count.is_multiple_of(self.interval) {
            info!("{} {} (complete)", self.message, count);
        }
    }
}
