//! Interval-based progress logging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use log::info;

use crate::logging::{format_duration, format_rate};
use crate::metrics::format_count;

/// Default number of items between progress messages.
pub const DEFAULT_INTERVAL: u64 = 1_000_000;

/// Thread-safe counter that logs each time the count crosses a multiple of its interval.
///
/// Each message carries the elapsed time and the average throughput since the tracker was
/// created.
///
/// # Example
/// ```
/// use fgmerge_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Processed", "pairs").with_interval(100);
/// for _ in 0..3 {
///     tracker.add(90); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs the final count of 270
/// assert_eq!(tracker.count(), 270);
/// ```
pub struct ProgressTracker {
    label: String,
    unit: String,
    interval: u64,
    count: AtomicU64,
    started: Instant,
}

impl ProgressTracker {
    /// Creates a tracker logging `"{label} N {unit}"` every [`DEFAULT_INTERVAL`] items.
    #[must_use]
    pub fn new(label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            interval: DEFAULT_INTERVAL,
            count: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Sets the number of items between messages; zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds `additional` items, logging once for every interval boundary crossed.
    ///
    /// Returns the number of messages logged by this call.
    pub fn add(&self, additional: u64) -> u64 {
        if additional == 0 {
            return 0;
        }
        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let first = prev / self.interval + 1;
        let last = (prev + additional) / self.interval;
        for milestone in (first..=last).map(|i| i * self.interval) {
            self.log_count(milestone, "");
        }
        last.saturating_sub(first - 1)
    }

    /// Logs the final count unless the last [`add`](Self::add) already logged it.
    pub fn log_final(&self) {
        let count = self.count();
        if count > 0 && !count.is_multiple_of(self.interval) {
            self.log_count(count, " (complete)");
        }
    }

    /// Items counted so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn log_count(&self, count: u64, suffix: &str) {
        let elapsed = self.started.elapsed();
        info!(
            "{} {} {}{suffix} [{}, {}]",
            self.label,
            format_count(count),
            self.unit,
            format_duration(elapsed),
            format_rate(count, elapsed, &self.unit)
        );
    }
}
