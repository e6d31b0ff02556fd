//! Error path integration tests.
//!
//! Configuration problems stop a run before any output is written; problems with individual
//! pairs are counted and the run continues.

use std::fs;

use tempfile::TempDir;

use crate::helpers::{
    FRAGMENT, FastqRecord, READ_LEN, assert_failure_mentions, assert_success, overlapping_pair,
    read_fastq, read_metrics, run_fgmerge, write_fastq, write_pairs,
};

fn path_str(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

fn write_good_inputs(dir: &TempDir) {
    let pairs = vec![overlapping_pair("p", FRAGMENT, READ_LEN)];
    write_pairs(&dir.path().join("r1.fq"), &dir.path().join("r2.fq"), &pairs);
}

fn merge_args(dir: &TempDir, extra: &[&str]) -> Vec<String> {
    let mut args = vec![
        "merge".to_string(),
        "-1".to_string(),
        path_str(dir, "r1.fq"),
        "-2".to_string(),
        path_str(dir, "r2.fq"),
        "-o".to_string(),
        path_str(dir, "merged.fq"),
    ];
    args.extend(extra.iter().map(|s| (*s).to_string()));
    args
}

fn run(args: &[String]) -> std::process::Output {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_fgmerge(&args)
}

// ==================== Configuration errors ====================

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let output = run(&merge_args(&dir, &[]));
    assert_failure_mentions(&output, "does not exist");
    assert!(!dir.path().join("merged.fq").exists());
}

#[test]
fn test_zero_threads_fails_before_processing() {
    let dir = TempDir::new().unwrap();
    write_good_inputs(&dir);
    let output = run(&merge_args(&dir, &["--threads", "0"]));
    assert_failure_mentions(&output, "worker-count");
    assert!(!dir.path().join("merged.fq").exists());
}

#[test]
fn test_similarity_out_of_range() {
    let dir = TempDir::new().unwrap();
    write_good_inputs(&dir);
    let output = run(&merge_args(&dir, &["--min-similarity", "1.5"]));
    assert_failure_mentions(&output, "min-similarity");
}

#[test]
fn test_positive_mismatch_score() {
    let dir = TempDir::new().unwrap();
    write_good_inputs(&dir);
    let output = run(&merge_args(&dir, &["--mismatch-score", "2"]));
    assert_failure_mentions(&output, "mismatch-score");
}

#[test]
fn test_oversized_match_score() {
    let dir = TempDir::new().unwrap();
    write_good_inputs(&dir);
    let output = run(&merge_args(&dir, &["--match-score", "1073741823"]));
    assert_failure_mentions(&output, "match-score");
    assert!(!dir.path().join("merged.fq").exists());
}

#[test]
fn test_zero_batch_size() {
    let dir = TempDir::new().unwrap();
    write_good_inputs(&dir);
    let output = run(&merge_args(&dir, &["--batch-size", "0"]));
    assert_failure_mentions(&output, "batch-size");
}

#[test]
fn test_incomplete_quality_table() {
    let dir = TempDir::new().unwrap();
    write_good_inputs(&dir);
    let table = dir.path().join("table.tsv");
    fs::write(&table, "qual_a\tqual_b\tis_match\tfused\n0\t0\ttrue\t2\n").unwrap();

    let output = run(&merge_args(&dir, &["--quality-table", table.to_str().unwrap()]));
    assert_failure_mentions(&output, "quality table");
}

#[test]
fn test_invalid_quality_character_aborts() {
    let dir = TempDir::new().unwrap();
    let mut r1 = FastqRecord::new("p/1", "ACGT", 'I');
    r1.qual = "II I".to_string();
    write_fastq(&dir.path().join("r1.fq"), &[r1]);
    write_fastq(&dir.path().join("r2.fq"), &[FastqRecord::new("p/2", "ACGT", 'I')]);

    let output = run(&merge_args(&dir, &[]));
    assert_failure_mentions(&output, "invalid quality character");
}

// ==================== Per-pair problems ====================

#[test]
fn test_unequal_input_lengths_count_malformed_pairs() {
    let dir = TempDir::new().unwrap();
    let pairs: Vec<_> =
        (0..3).map(|i| overlapping_pair(&format!("p{i}"), FRAGMENT, READ_LEN)).collect();
    let (r1, r2): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
    write_fastq(&dir.path().join("r1.fq"), &r1);
    write_fastq(&dir.path().join("r2.fq"), &r2[..2]);

    let output = run(&merge_args(&dir, &["--metrics", &path_str(&dir, "metrics.txt")]));
    assert_success(&output);

    assert_eq!(read_fastq(&dir.path().join("merged.fq")).len(), 2);
    let metrics = read_metrics(&dir.path().join("metrics.txt"));
    assert_eq!(metrics.total_pairs, 3);
    assert_eq!(metrics.merged_pairs, 2);
    assert_eq!(metrics.malformed_pairs, 1);
}

#[test]
fn test_mismatched_names_do_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let good = overlapping_pair("good", FRAGMENT, READ_LEN);
    let (bad_r1, _) = overlapping_pair("left", FRAGMENT, READ_LEN);
    let (_, bad_r2) = overlapping_pair("right", FRAGMENT, READ_LEN);
    write_pairs(&dir.path().join("r1.fq"), &dir.path().join("r2.fq"), &[(bad_r1, bad_r2), good]);

    let output = run(&merge_args(&dir, &["--metrics", &path_str(&dir, "metrics.txt")]));
    assert_success(&output);

    let merged = read_fastq(&dir.path().join("merged.fq"));
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].name, "good");

    let metrics = read_metrics(&dir.path().join("metrics.txt"));
    assert_eq!(metrics.total_pairs, 2);
    assert_eq!(metrics.malformed_pairs, 1);
    assert_eq!(metrics.failed_pairs, 0);
}
