//! Processes a single read pair from alignment to outcome.
//!
//! Each pair is aligned exactly once. The overlap identity and length from that alignment
//! decide acceptance; only accepted pairs are fused.

use std::sync::Arc;

use fgmerge_dna::reverse_complement;
use fgmerge_metrics::RejectionReason;
use thiserror::Error;

use super::MergeParams;
use super::aligner::{AlignmentError, AlignmentResult, OverlapAligner};
use super::fuser::fuse;
use super::quality_table::QualityScoreTable;
use crate::errors::Result;
use crate::read_pair::{PairInput, ReadPair};

/// A successfully merged pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    /// Identifier of the pair
    pub id: String,
    /// Merged bases
    pub bases: Vec<u8>,
    /// Merged numeric qualities
    pub quals: Vec<u8>,
    /// Number of columns in the overlap
    pub overlap_length: usize,
    /// Identity of the overlap
    pub percent_identity: f64,
}

/// A pair that aligned but failed one or both acceptance thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRejection {
    /// Overlap identity was below `min_similarity`
    pub below_similarity: bool,
    /// Overlap was shorter than `min_alignment_length`
    pub below_length: bool,
    /// Number of columns in the overlap
    pub overlap_length: usize,
    /// Identity of the overlap
    pub percent_identity: f64,
}

/// Problems that prevent a single pair from being processed.
///
/// These never abort a batch; they are reported as [`PairOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    /// The alignment or fusion could not be computed
    #[error("alignment computation failed: {0}")]
    AlignmentComputation(#[from] AlignmentError),

    /// Processing the pair panicked
    #[error("processing panicked: {reason}")]
    Panicked {
        /// Panic message
        reason: String,
    },

    /// The mates were missing, mismatched, or internally inconsistent
    #[error("malformed pair: {reason}")]
    MalformedPair {
        /// What was wrong with the pair
        reason: String,
    },
}

/// Result of processing one pair.
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// The pair was merged
    Merged(MergedRecord),
    /// The pair failed one or both thresholds
    Rejected(ThresholdRejection),
    /// The pair could not be processed
    Failed(PairError),
}

impl PairOutcome {
    /// Returns the merged record, if any.
    #[must_use]
    pub fn merged(&self) -> Option<&MergedRecord> {
        match self {
            PairOutcome::Merged(record) => Some(record),
            _ => None,
        }
    }

    /// Reasons this pair did not merge; empty for a merged pair.
    #[must_use]
    pub fn rejection_reasons(&self) -> Vec<RejectionReason> {
        match self {
            PairOutcome::Merged(_) => Vec::new(),
            PairOutcome::Rejected(rejection) => {
                let mut reasons = Vec::with_capacity(2);
                if rejection.below_similarity {
                    reasons.push(RejectionReason::BelowSimilarity);
                }
                if rejection.below_length {
                    reasons.push(RejectionReason::BelowLength);
                }
                reasons
            }
            PairOutcome::Failed(
                PairError::AlignmentComputation(_) | PairError::Panicked { .. },
            ) => {
                vec![RejectionReason::ComputationFailed]
            }
            PairOutcome::Failed(PairError::MalformedPair { .. }) => {
                vec![RejectionReason::MalformedPair]
            }
        }
    }
}

/// Merges read pairs with fixed parameters and a shared quality table.
///
/// `PairMerger` is immutable and `Sync`; one instance serves every worker of a batch.
#[derive(Debug, Clone)]
pub struct PairMerger {
    params: MergeParams,
    table: Arc<QualityScoreTable>,
}

impl PairMerger {
    /// Creates a merger after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of range.
    pub fn new(params: MergeParams, table: Arc<QualityScoreTable>) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, table })
    }

    /// Creates a merger with a freshly built posterior quality table.
    pub fn with_posterior_table(params: MergeParams) -> Result<Self> {
        let table = QualityScoreTable::try_posterior(params.max_quality)?;
        Self::new(params, Arc::new(table))
    }

    /// Parameters in effect.
    #[must_use]
    pub fn params(&self) -> &MergeParams {
        &self.params
    }

    /// Quality table in effect.
    #[must_use]
    pub fn table(&self) -> &QualityScoreTable {
        &self.table
    }

    /// Creates an aligner configured with this merger's scoring.
    #[must_use]
    pub fn aligner(&self) -> OverlapAligner {
        OverlapAligner::new(self.params.scoring)
    }

    /// Processes one pair with a one-off aligner.
    #[must_use]
    pub fn process(&self, pair: &ReadPair) -> PairOutcome {
        self.process_with(&mut self.aligner(), pair)
    }

    /// Processes one pair, reusing `aligner`'s scratch space.
    pub fn process_with(&self, aligner: &mut OverlapAligner, pair: &ReadPair) -> PairOutcome {
        match self.try_process(aligner, pair) {
            Ok(outcome) => outcome,
            Err(error) => PairOutcome::Failed(error),
        }
    }

    /// Processes one unit of input; a read without a mate is a malformed pair.
    pub fn process_input_with(
        &self,
        aligner: &mut OverlapAligner,
        input: &PairInput,
    ) -> PairOutcome {
        match input {
            PairInput::Paired(pair) => self.process_with(aligner, pair),
            PairInput::Orphan { read, mate } => PairOutcome::Failed(PairError::MalformedPair {
                reason: format!("{mate} '{}' has no mate", read.name),
            }),
        }
    }

    fn try_process(
        &self,
        aligner: &mut OverlapAligner,
        pair: &ReadPair,
    ) -> std::result::Result<PairOutcome, PairError> {
        pair.check_mates().map_err(|reason| PairError::MalformedPair { reason })?;

        let (r1, r2) = (&pair.r1, &pair.r2);
        let oriented;
        let (seq_b, qual_b): (&[u8], &[u8]) = if self.params.reverse_complement_second_read {
            let mut quals = r2.quals.clone();
            quals.reverse();
            oriented = (reverse_complement(&r2.bases), quals);
            (&oriented.0, &oriented.1)
        } else {
            (&r2.bases, &r2.quals)
        };

        let alignment = aligner.align(&r1.bases, seq_b)?;
        if let Some(rejection) = self.check_thresholds(&alignment) {
            return Ok(PairOutcome::Rejected(rejection));
        }

        let fused = fuse(&r1.bases, &r1.quals, seq_b, qual_b, &alignment, &self.table)?;
        Ok(PairOutcome::Merged(MergedRecord {
            id: pair.id().to_string(),
            bases: fused.bases,
            quals: fused.quals,
            overlap_length: alignment.overlap_length(),
            percent_identity: alignment.percent_identity(),
        }))
    }

    /// Evaluates both thresholds independently; `None` means the pair is accepted.
    fn check_thresholds(&self, alignment: &AlignmentResult) -> Option<ThresholdRejection> {
        let percent_identity = alignment.percent_identity();
        let overlap_length = alignment.overlap_length();
        let below_similarity = percent_identity < self.params.min_similarity;
        let below_length = overlap_length < self.params.min_alignment_length;
        (below_similarity || below_length).then_some(ThresholdRejection {
            below_similarity,
            below_length,
            overlap_length,
            percent_identity,
        })
    }
}
