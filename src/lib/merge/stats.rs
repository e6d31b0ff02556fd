//! Run totals over pair outcomes.

use fgmerge_metrics::MergeMetrics;

use super::processor::{PairError, PairOutcome};

/// Counters over every pair outcome of a run.
///
/// `total` is incremented once per outcome. `below_similarity` and `below_length` are
/// counted independently, so a pair failing both thresholds increments both. The remaining
/// counters partition `total`: `merged + rejected + failed + malformed == total`.
///
/// Tallies are plain values; workers keep their own and combine them with
/// [`RejectionTally::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionTally {
    /// Outcomes seen
    pub total: u64,
    /// Outcomes whose overlap identity was below the minimum
    pub below_similarity: u64,
    /// Outcomes whose overlap was shorter than the minimum
    pub below_length: u64,
    /// Pairs merged
    pub merged: u64,
    /// Pairs rejected by one or both thresholds
    pub rejected: u64,
    /// Pairs whose alignment could not be computed
    pub failed: u64,
    /// Pairs with missing or mismatched mates
    pub malformed: u64,
    /// Sum of overlap lengths over merged pairs
    pub merged_overlap_bases: u64,
}

impl RejectionTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one outcome.
    pub fn record(&mut self, outcome: &PairOutcome) {
        self.total += 1;
        match outcome {
            PairOutcome::Merged(record) => {
                self.merged += 1;
                self.merged_overlap_bases += record.overlap_length as u64;
            }
            PairOutcome::Rejected(rejection) => {
                self.rejected += 1;
                self.below_similarity += u64::from(rejection.below_similarity);
                self.below_length += u64::from(rejection.below_length);
            }
            PairOutcome::Failed(
                PairError::AlignmentComputation(_) | PairError::Panicked { .. },
            ) => self.failed += 1,
            PairOutcome::Failed(PairError::MalformedPair { .. }) => self.malformed += 1,
        }
    }

    /// Folds a sequence of outcomes into a fresh tally.
    ///
    /// # Examples
    ///
    /// ```
    /// use fgmerge_lib::merge::{PairOutcome, RejectionTally, ThresholdRejection};
    ///
    /// let both = PairOutcome::Rejected(ThresholdRejection {
    ///     below_similarity: true,
    ///     below_length: true,
    ///     overlap_length: 0,
    ///     percent_identity: 0.0,
    /// });
    /// let tally = RejectionTally::accumulate([&both, &both]);
    /// assert_eq!((tally.total, tally.below_similarity, tally.below_length), (2, 2, 2));
    /// ```
    pub fn accumulate<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a PairOutcome>,
    {
        let mut tally = Self::default();
        for outcome in outcomes {
            tally.record(outcome);
        }
        tally
    }

    /// Adds another tally's counts to this one.
    pub fn merge(&mut self, other: &Self) {
        self.total += other.total;
        self.below_similarity += other.below_similarity;
        self.below_length += other.below_length;
        self.merged += other.merged;
        self.rejected += other.rejected;
        self.failed += other.failed;
        self.malformed += other.malformed;
        self.merged_overlap_bases += other.merged_overlap_bases;
    }

    /// Converts the tally into the metrics row written at the end of a run.
    #[must_use]
    pub fn to_metrics(&self) -> MergeMetrics {
        let ratio = |num: u64, den: u64| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        MergeMetrics {
            total_pairs: self.total,
            merged_pairs: self.merged,
            below_similarity: self.below_similarity,
            below_length: self.below_length,
            failed_pairs: self.failed,
            malformed_pairs: self.malformed,
            fraction_merged: ratio(self.merged, self.total),
            mean_overlap_length: ratio(self.merged_overlap_bases, self.merged),
        }
    }
}
