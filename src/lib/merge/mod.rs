//! Read-pair merging.
//!
//! - [`aligner`] finds the overlap between the two mates
//! - [`quality_table`] holds the precomputed merged-base qualities
//! - [`fuser`] builds the merged read along an alignment
//! - [`processor`] runs one pair end to end and classifies the outcome
//! - [`dispatcher`] runs batches of pairs on a worker pool
//! - [`stats`] folds outcomes into run totals

pub mod aligner;
pub mod dispatcher;
pub mod fuser;
pub mod processor;
pub mod quality_table;
pub mod stats;

pub use aligner::{
    AlignmentResult, AlignmentScoring, MAX_SCORE_MAGNITUDE, OverlapAligner, align,
};
pub use dispatcher::{ParallelDispatcher, TaggedOutcome, run_batch};
pub use fuser::{FusedRead, fuse};
pub use processor::{MergedRecord, PairError, PairMerger, PairOutcome, ThresholdRejection};
pub use quality_table::QualityScoreTable;
pub use stats::RejectionTally;

use crate::errors::{FgmergeError, Result};
use crate::phred::{MAX_PHRED, MIN_PHRED};

/// Parameters controlling how pairs are aligned, accepted, and processed.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeParams {
    /// Alignment scores
    pub scoring: AlignmentScoring,
    /// Minimum overlap identity, in `[0, 1]`, to accept a merge
    pub min_similarity: f64,
    /// Minimum overlap length, in columns, to accept a merge
    pub min_alignment_length: usize,
    /// Reverse complement the second read before aligning
    pub reverse_complement_second_read: bool,
    /// Number of worker threads
    pub worker_count: usize,
    /// Highest merged base quality
    pub max_quality: u8,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            scoring: AlignmentScoring::default(),
            min_similarity: 0.9,
            min_alignment_length: 10,
            reverse_complement_second_read: true,
            worker_count: 1,
            max_quality: MAX_PHRED,
        }
    }
}

impl MergeParams {
    /// Checks every parameter, returning the first problem found.
    ///
    /// # Examples
    ///
    /// ```
    /// use fgmerge_lib::merge::MergeParams;
    ///
    /// assert!(MergeParams::default().validate().is_ok());
    /// assert!(MergeParams { worker_count: 0, ..MergeParams::default() }.validate().is_err());
    /// assert!(MergeParams { min_similarity: 1.5, ..MergeParams::default() }.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(invalid("worker-count", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(FgmergeError::InvalidFraction {
                parameter: "min-similarity".to_string(),
                value: self.min_similarity,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.min_alignment_length == 0 {
            return Err(invalid("min-alignment-length", "must be at least 1"));
        }
        if !(1..=MAX_SCORE_MAGNITUDE).contains(&self.scoring.match_score) {
            return Err(invalid(
                "match-score",
                &format!("must be between 1 and {MAX_SCORE_MAGNITUDE}"),
            ));
        }
        for (parameter, value) in [
            ("mismatch-score", self.scoring.mismatch_score),
            ("gap-penalty", self.scoring.gap_penalty),
        ] {
            if !(-MAX_SCORE_MAGNITUDE..=-1).contains(&value) {
                return Err(invalid(
                    parameter,
                    &format!("must be between -{MAX_SCORE_MAGNITUDE} and -1"),
                ));
            }
        }
        if !(MIN_PHRED..=MAX_PHRED).contains(&self.max_quality) {
            return Err(FgmergeError::InvalidQuality {
                value: self.max_quality,
                min: MIN_PHRED,
                max: MAX_PHRED,
            });
        }
        Ok(())
    }
}

fn invalid(parameter: &str, reason: &str) -> FgmergeError {
    FgmergeError::InvalidParameter { parameter: parameter.to_string(), reason: reason.to_string() }
}
