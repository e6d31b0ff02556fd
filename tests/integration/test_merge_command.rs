//! Integration tests for the merge command.

use std::fs;

use fgmerge_lib::metrics::MergeMetrics;
use tempfile::TempDir;

use crate::helpers::{
    FRAGMENT, FastqRecord, READ_LEN, assert_metrics_consistent, assert_success,
    non_overlapping_pair, overlapping_pair, read_fastq, read_metrics, run_fgmerge, write_pairs,
};

/// Paths for one merge run inside a temp dir.
struct MergeFiles {
    dir: TempDir,
}

impl MergeFiles {
    fn new() -> Self {
        Self { dir: TempDir::new().expect("Failed to create temp dir") }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_str().expect("temp path is UTF-8").to_string()
    }

    fn write_inputs(&self, pairs: &[(FastqRecord, FastqRecord)]) {
        write_pairs(&self.dir.path().join("r1.fq"), &self.dir.path().join("r2.fq"), pairs);
    }

    fn read(&self, name: &str) -> Vec<FastqRecord> {
        read_fastq(&self.dir.path().join(name))
    }

    fn metrics(&self) -> MergeMetrics {
        read_metrics(&self.dir.path().join("metrics.txt"))
    }
}

#[test]
fn test_merge_basic() {
    let files = MergeFiles::new();
    let pairs: Vec<_> =
        (0..3).map(|i| overlapping_pair(&format!("p{i}"), FRAGMENT, READ_LEN)).collect();
    files.write_inputs(&pairs);

    let output = run_fgmerge(&[
        "merge",
        "--r1",
        &files.path("r1.fq"),
        "--r2",
        &files.path("r2.fq"),
        "--output",
        &files.path("merged.fq"),
        "--metrics",
        &files.path("metrics.txt"),
    ]);
    assert_success(&output);

    let merged = files.read("merged.fq");
    assert_eq!(merged.len(), 3);
    for (i, record) in merged.iter().enumerate() {
        assert_eq!(record.name, format!("p{i}"));
        assert_eq!(record.seq, FRAGMENT);
        assert_eq!(record.qual.len(), FRAGMENT.len());

        let overlap_start = FRAGMENT.len() - READ_LEN;
        let quals = record.qual.as_bytes();
        assert!(quals[..overlap_start].iter().all(|&q| q == b'I'));
        assert!(quals[overlap_start..READ_LEN].iter().all(|&q| q > b'I'));
        assert!(quals[READ_LEN..].iter().all(|&q| q == b'I'));
    }

    let metrics = files.metrics();
    assert_eq!(metrics.total_pairs, 3);
    assert_eq!(metrics.merged_pairs, 3);
    assert_eq!(metrics.below_similarity, 0);
    assert_eq!(metrics.below_length, 0);
    assert!((metrics.fraction_merged - 1.0).abs() < 1e-9);
    assert!((metrics.mean_overlap_length - (2 * READ_LEN - FRAGMENT.len()) as f64).abs() < 1e-9);
}

#[test]
fn test_unmerged_pairs_are_written_unchanged() {
    let files = MergeFiles::new();
    let pairs = vec![
        overlapping_pair("keep1", FRAGMENT, READ_LEN),
        non_overlapping_pair("reject1"),
        overlapping_pair("keep2", FRAGMENT, READ_LEN),
    ];
    files.write_inputs(&pairs);

    let output = run_fgmerge(&[
        "merge",
        "-1",
        &files.path("r1.fq"),
        "-2",
        &files.path("r2.fq"),
        "-o",
        &files.path("merged.fq"),
        "--unmerged-r1",
        &files.path("un1.fq"),
        "--unmerged-r2",
        &files.path("un2.fq"),
        "--metrics",
        &files.path("metrics.txt"),
    ]);
    assert_success(&output);

    let merged = files.read("merged.fq");
    let names: Vec<_> = merged.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["keep1", "keep2"]);

    let un1 = files.read("un1.fq");
    let un2 = files.read("un2.fq");
    assert_eq!(un1, vec![pairs[1].0.clone()]);
    assert_eq!(un2, vec![pairs[1].1.clone()]);

    let metrics = files.metrics();
    assert_metrics_consistent(&metrics);
    assert_eq!(metrics.total_pairs, 3);
    assert_eq!(metrics.merged_pairs, 2);
    assert_eq!(metrics.below_similarity, 1);
    assert_eq!(metrics.below_length, 1);
}

#[test]
fn test_min_alignment_length_rejects_short_overlaps() {
    let files = MergeFiles::new();
    let pairs = vec![overlapping_pair("p", FRAGMENT, READ_LEN)];
    files.write_inputs(&pairs);

    let output = run_fgmerge(&[
        "merge",
        "-1",
        &files.path("r1.fq"),
        "-2",
        &files.path("r2.fq"),
        "-o",
        &files.path("merged.fq"),
        "--min-alignment-length",
        "50",
        "--metrics",
        &files.path("metrics.txt"),
    ]);
    assert_success(&output);

    assert!(files.read("merged.fq").is_empty());
    let metrics = files.metrics();
    assert_eq!(metrics.total_pairs, 1);
    assert_eq!(metrics.below_length, 1);
    assert_eq!(metrics.below_similarity, 0);
}

#[test]
fn test_thread_count_does_not_change_output() {
    let files = MergeFiles::new();
    let pairs: Vec<_> = (0..11)
        .map(|i| {
            if i % 3 == 0 {
                non_overlapping_pair(&format!("n{i}"))
            } else {
                overlapping_pair(&format!("o{i}"), FRAGMENT, READ_LEN)
            }
        })
        .collect();
    files.write_inputs(&pairs);

    for (threads, name) in [("1", "single.fq"), ("4", "multi.fq")] {
        let output = run_fgmerge(&[
            "merge",
            "-1",
            &files.path("r1.fq"),
            "-2",
            &files.path("r2.fq"),
            "-o",
            &files.path(name),
            "--threads",
            threads,
            "--batch-size",
            "3",
        ]);
        assert_success(&output);
    }

    let single = fs::read(files.path("single.fq")).expect("Failed to read output");
    let multi = fs::read(files.path("multi.fq")).expect("Failed to read output");
    assert!(!single.is_empty());
    assert_eq!(single, multi);
}

#[test]
fn test_quality_table_round_trip_through_merge() {
    let files = MergeFiles::new();
    let pairs = vec![overlapping_pair("p", FRAGMENT, READ_LEN)];
    files.write_inputs(&pairs);

    let output =
        run_fgmerge(&["quality-table", "-o", &files.path("table.tsv"), "--max-quality", "45"]);
    assert_success(&output);

    let output = run_fgmerge(&[
        "merge",
        "-1",
        &files.path("r1.fq"),
        "-2",
        &files.path("r2.fq"),
        "-o",
        &files.path("merged.fq"),
        "--quality-table",
        &files.path("table.tsv"),
    ]);
    assert_success(&output);

    let merged = files.read("merged.fq");
    assert_eq!(merged.len(), 1);
    // Q45 is encoded as 'N'
    let overlap = &merged[0].qual.as_bytes()[FRAGMENT.len() - READ_LEN..READ_LEN];
    assert!(overlap.iter().all(|&q| q == b'N'), "{}", merged[0].qual);
}

#[test]
fn test_agreement_above_max_quality_keeps_read_quality() {
    let files = MergeFiles::new();
    let (mut r1, mut r2) = overlapping_pair("p", FRAGMENT, READ_LEN);
    // Q45 inputs fused with a Q41 table
    r1.qual = "N".repeat(READ_LEN);
    r2.qual = "N".repeat(READ_LEN);
    files.write_inputs(&[(r1, r2)]);

    let output = run_fgmerge(&[
        "merge",
        "-1",
        &files.path("r1.fq"),
        "-2",
        &files.path("r2.fq"),
        "-o",
        &files.path("merged.fq"),
        "--max-quality",
        "41",
    ]);
    assert_success(&output);

    let merged = files.read("merged.fq");
    assert_eq!(merged.len(), 1);
    assert!(merged[0].qual.bytes().all(|q| q == b'N'), "{}", merged[0].qual);
}

#[test]
fn test_no_reverse_complement() {
    let files = MergeFiles::new();
    let (r1, mut r2) = overlapping_pair("p", FRAGMENT, READ_LEN);
    // Give R2 in the same orientation as R1
    r2.seq = FRAGMENT[FRAGMENT.len() - READ_LEN..].to_string();
    files.write_inputs(&[(r1, r2)]);

    let output = run_fgmerge(&[
        "merge",
        "-1",
        &files.path("r1.fq"),
        "-2",
        &files.path("r2.fq"),
        "-o",
        &files.path("merged.fq"),
        "--no-reverse-complement",
    ]);
    assert_success(&output);

    let merged = files.read("merged.fq");
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].seq, FRAGMENT);
}

#[test]
fn test_empty_inputs() {
    let files = MergeFiles::new();
    files.write_inputs(&[]);

    let output = run_fgmerge(&[
        "merge",
        "-1",
        &files.path("r1.fq"),
        "-2",
        &files.path("r2.fq"),
        "-o",
        &files.path("merged.fq"),
        "--metrics",
        &files.path("metrics.txt"),
    ]);
    assert_success(&output);
    assert!(files.read("merged.fq").is_empty());
    assert_eq!(files.metrics().total_pairs, 0);
}
