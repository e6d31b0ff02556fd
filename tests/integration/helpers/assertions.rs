//! Assertion and command helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use fgmerge_lib::metrics::MergeMetrics;
use fgoxide::io::DelimFile;

/// Runs the `fgmerge` binary with `args` and returns its output.
pub fn run_fgmerge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fgmerge"))
        .args(args)
        .output()
        .expect("Failed to run fgmerge")
}

/// Asserts that a command succeeded, printing its stderr if it did not.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "fgmerge failed with {}:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Asserts that a command failed and that its stderr mentions `expected`.
pub fn assert_failure_mentions(output: &Output, expected: &str) {
    assert!(!output.status.success(), "fgmerge unexpectedly succeeded");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(expected), "stderr did not mention '{expected}':\n{stderr}");
}

/// Reads the single metrics row written by `merge --metrics`.
pub fn read_metrics(path: &Path) -> MergeMetrics {
    let mut rows: Vec<MergeMetrics> =
        DelimFile::default().read_tsv(&path).expect("Failed to read metrics");
    assert_eq!(rows.len(), 1, "expected exactly one metrics row");
    rows.remove(0)
}

/// Asserts that the counters of a metrics row account for every pair.
pub fn assert_metrics_consistent(metrics: &MergeMetrics) {
    let accounted = metrics.merged_pairs + metrics.failed_pairs + metrics.malformed_pairs;
    assert!(accounted <= metrics.total_pairs);
    assert!(metrics.below_similarity <= metrics.total_pairs);
    assert!(metrics.below_length <= metrics.total_pairs);
}
