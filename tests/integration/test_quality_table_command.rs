//! Integration tests for the quality-table command.

use fgmerge_lib::merge::QualityScoreTable;
use fgmerge_lib::merge::quality_table::QualityTableEntry;
use fgoxide::io::DelimFile;
use tempfile::TempDir;

use crate::helpers::{assert_failure_mentions, assert_success, run_fgmerge};

#[test]
fn test_quality_table_default() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("table.tsv");

    let output = run_fgmerge(&["quality-table", "-o", path.to_str().unwrap()]);
    assert_success(&output);

    let header = std::fs::read_to_string(&path).unwrap();
    assert!(header.starts_with("qual_a\tqual_b\tis_match\tfused\n"));

    let entries: Vec<QualityTableEntry> = DelimFile::default().read_tsv(&path).unwrap();
    assert_eq!(entries.len(), 94 * 94 * 2);
    assert!(entries.iter().all(|e| e.fused <= 93));
    assert_eq!(QualityScoreTable::from_tsv(&path).unwrap(), QualityScoreTable::posterior(93));
}

#[test]
fn test_quality_table_max_quality() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("table.tsv");

    let output = run_fgmerge(&["quality-table", "-o", path.to_str().unwrap(), "-q", "30"]);
    assert_success(&output);

    let table = QualityScoreTable::from_tsv(&path).unwrap();
    assert_eq!(table.max_quality(), 30);
    assert_eq!(table.fused(30, 30, true), 30);
}

#[test]
fn test_quality_table_rejects_out_of_range_max() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("table.tsv");

    let output = run_fgmerge(&["quality-table", "-o", path.to_str().unwrap(), "-q", "94"]);
    assert_failure_mentions(&output, "Invalid quality score: 94");
    assert!(!path.exists());
}
