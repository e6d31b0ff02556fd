//! Metrics for a read-pair merging run.

use serde::{Deserialize, Serialize};

use crate::{Metric, ProcessingMetrics};

/// Summary of a read-pair merging run, written as a single TSV row.
///
/// `below_similarity` and `below_length` are counted independently, so a pair failing both
/// thresholds appears in both columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeMetrics {
    /// Number of read pairs examined
    pub total_pairs: u64,
    /// Number of pairs merged into a single read
    pub merged_pairs: u64,
    /// Pairs whose overlap identity was below the minimum similarity
    pub below_similarity: u64,
    /// Pairs whose overlap was shorter than the minimum alignment length
    pub below_length: u64,
    /// Pairs for which the alignment could not be computed
    pub failed_pairs: u64,
    /// Pairs whose mates were missing or mismatched
    pub malformed_pairs: u64,
    /// Fraction of pairs that were merged
    pub fraction_merged: f64,
    /// Mean overlap length over merged pairs
    pub mean_overlap_length: f64,
}

impl Metric for MergeMetrics {
    fn metric_name() -> &'static str {
        "merge"
    }
}

impl ProcessingMetrics for MergeMetrics {
    fn total_input(&self) -> u64 {
        self.total_pairs
    }

    fn total_output(&self) -> u64 {
        self.merged_pairs
    }

    fn total_filtered(&self) -> u64 {
        self.total_pairs.saturating_sub(self.merged_pairs)
    }
}
