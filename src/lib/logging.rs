//! Formatting helpers and run summaries for log output.

use std::time::{Duration, Instant};

use crate::metrics::{MergeMetrics, ProcessingMetrics, RejectionReason, format_count};

/// Formats a fraction as a percentage with `decimals` decimal places.
///
/// # Examples
///
/// ```
/// use fgmerge_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0)
}

/// Formats a duration as the two most significant units, e.g. `"2m 15s"` or `"1h 30m"`.
///
/// # Examples
///
/// ```
/// use fgmerge_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (major, minor, units) = match secs {
        0..60 => return format!("{secs}s"),
        60..3600 => (secs / 60, secs % 60, ("m", "s")),
        _ => (secs / 3600, (secs % 3600) / 60, ("h", "m")),
    };
    if minor == 0 {
        format!("{major}{}", units.0)
    } else {
        format!("{major}{} {minor}{}", units.0, units.1)
    }
}

/// Formats a throughput for `count` items of kind `unit` processed in `duration`.
///
/// Rates below one per second are reported per minute.
///
/// # Examples
///
/// ```
/// use fgmerge_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(12_000, Duration::from_secs(2), "pairs"), "6,000 pairs/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60), "pairs"), "30.0 pairs/min");
/// ```
#[must_use]
pub fn format_rate(count: u64, duration: Duration, unit: &str) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} {unit}/s", format_count(count));
    }
    let per_sec = count as f64 / secs;
    if per_sec >= 1.0 {
        format!("{} {unit}/s", format_count(per_sec as u64))
    } else {
        format!("{:.1} {unit}/min", per_sec * 60.0)
    }
}

/// Logs the end-of-run summary for a merge.
///
/// Every pair is accounted for: merged, rejected by a threshold, failed, or malformed. Threshold
/// counters overlap when a pair fails both, so they are listed separately from the total.
///
/// # Examples
///
/// ```no_run
/// use fgmerge_lib::logging::log_merge_summary;
/// use fgmerge_lib::metrics::MergeMetrics;
///
/// let metrics = MergeMetrics { total_pairs: 1_000, merged_pairs: 900, ..Default::default() };
/// log_merge_summary(&metrics);
/// ```
pub fn log_merge_summary(metrics: &MergeMetrics) {
    log::info!("Read Pair Merging Summary:");
    log::info!("  Input pairs: {}", format_count(metrics.total_input()));
    log::info!("  Merged pairs: {}", format_count(metrics.total_output()));

    if metrics.total_input() == 0 {
        return;
    }
    log::info!("  Merge rate: {:.2}%", metrics.efficiency());
    log::info!("  Not merged: {}", format_count(metrics.total_filtered()));
    if metrics.merged_pairs > 0 {
        log::info!("  Mean overlap length: {:.1}", metrics.mean_overlap_length);
    }

    let reasons = [
        (RejectionReason::BelowSimilarity, metrics.below_similarity),
        (RejectionReason::BelowLength, metrics.below_length),
        (RejectionReason::ComputationFailed, metrics.failed_pairs),
        (RejectionReason::MalformedPair, metrics.malformed_pairs),
    ];
    if reasons.iter().any(|(_, count)| *count > 0) {
        log::info!("  Pairs not merged, by reason:");
        for (reason, count) in reasons.iter().filter(|(_, count)| *count > 0) {
            log::info!("    {reason}: {}", format_count(*count));
        }
    }
}

/// Times an operation and logs its start and completion.
///
/// # Examples
///
/// ```no_run
/// use fgmerge_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Merging read pairs");
/// // ... do work ...
/// timer.log_completion(10_000, "pairs");
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Starts the timer and logs `"{operation} ..."`.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Time since the timer was started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Logs completion with the number of `unit`s processed and the throughput.
    pub fn log_completion(&self, count: u64, unit: &str) {
        let duration = self.elapsed();
        log::info!(
            "{} completed: {} {unit} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration, unit)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.9543, 2, "95.43%")]
    #[case(0.5, 1, "50.0%")]
    #[case(1.0, 0, "100%")]
    #[case(0.0, 2, "0.00%")]
    fn test_format_percent(#[case] value: f64, #[case] decimals: usize, #[case] expected: &str) {
        assert_eq!(format_percent(value, decimals), expected);
    }

    #[rstest]
    #[case(0, "0s")]
    #[case(59, "59s")]
    #[case(60, "1m")]
    #[case(135, "2m 15s")]
    #[case(3600, "1h")]
    #[case(5400, "1h 30m")]
    #[case(7261, "2h 1m")]
    fn test_format_duration(#[case] secs: u64, #[case] expected: &str) {
        assert_eq!(format_duration(Duration::from_secs(secs)), expected);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1000, Duration::from_secs(1), "pairs"), "1,000 pairs/s");
        assert_eq!(format_rate(60, Duration::from_secs(60), "reads"), "1 reads/s");
        assert_eq!(format_rate(30, Duration::from_secs(60), "pairs"), "30.0 pairs/min");
        assert_eq!(format_rate(1000, Duration::from_nanos(1), "pairs"), "1,000 pairs/s");
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("Test");
        assert!(timer.elapsed() < Duration::from_secs(60));
        timer.log_completion(1000, "pairs");
    }

    #[test]
    fn test_log_merge_summary() {
        log_merge_summary(&MergeMetrics::default());

        let metrics = MergeMetrics {
            total_pairs: 10_000,
            merged_pairs: 8_000,
            below_similarity: 1_500,
            below_length: 900,
            failed_pairs: 3,
            malformed_pairs: 0,
            fraction_merged: 0.8,
            mean_overlap_length: 61.5,
        };
        log_merge_summary(&metrics);
    }
}
