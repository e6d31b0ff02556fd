//! Semi-global overlap alignment between two reads.
//!
//! The aligner scores a dynamic-programming matrix in which leading and trailing gaps on
//! either read are free, so the best alignment is the one that lines the suffix of one read
//! up against the prefix of the other (or contains one read inside the other). Gaps inside
//! the overlap cost `gap_penalty` per base.
//!
//! # Determinism
//!
//! Several end cells or tracebacks can share the best score. The choice is fixed:
//!
//! - End cell: the bottom-right corner is considered first, then the last column from the
//!   bottom row upwards, then the last row from the right-most column leftwards. A later
//!   cell only replaces the current choice when its score is strictly greater.
//! - Traceback: a diagonal step is preferred over a gap in `b`, which is preferred over a
//!   gap in `a`.
//!
//! Ambiguous bases (anything other than `A`, `C`, `G`, `T`) match any base.

use fgmerge_dna::bases_compatible;
use thiserror::Error;

/// Largest magnitude accepted for any single alignment score.
pub const MAX_SCORE_MAGNITUDE: i32 = 10_000;

/// Integer scores used when aligning two reads.
///
/// Matrix sums saturate, so oversized scores cannot overflow. `MergeParams::validate` rejects
/// any score larger in magnitude than [`MAX_SCORE_MAGNITUDE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentScoring {
    /// Score added for a matching column (positive)
    pub match_score: i32,
    /// Score added for a mismatching column (negative)
    pub mismatch_score: i32,
    /// Score added for each gapped column inside the overlap (negative)
    pub gap_penalty: i32,
}

impl Default for AlignmentScoring {
    fn default() -> Self {
        Self { match_score: 5, mismatch_score: -5, gap_penalty: -7 }
    }
}

impl AlignmentScoring {
    #[inline]
    fn substitution(&self, a: u8, b: u8) -> i32 {
        if bases_compatible(a, b) { self.match_score } else { self.mismatch_score }
    }
}

/// One column of the overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOp {
    /// Both reads have a base and they match
    Match,
    /// Both reads have a base and they differ
    Mismatch,
    /// Read `a` has a base opposite a gap in read `b`
    GapInB,
    /// Read `b` has a base opposite a gap in read `a`
    GapInA,
}

impl AlignOp {
    /// Number of bases of read `a` consumed by this column.
    #[must_use]
    pub const fn consumes_a(self) -> usize {
        match self {
            AlignOp::GapInA => 0,
            _ => 1,
        }
    }

    /// Number of bases of read `b` consumed by this column.
    #[must_use]
    pub const fn consumes_b(self) -> usize {
        match self {
            AlignOp::GapInB => 0,
            _ => 1,
        }
    }
}

/// Best overlap found between two reads.
///
/// Coordinates are zero-based, half-open. The overlap spans `a[a_start..a_end]` and
/// `b[b_start..b_end]`; everything outside is an end gap that did not contribute to the
/// score. Either `a_start` or `b_start` is zero, and either `a_end == a.len()` or
/// `b_end == b.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    /// Start of the overlap in `a`
    pub a_start: usize,
    /// End of the overlap in `a` (exclusive)
    pub a_end: usize,
    /// Start of the overlap in `b`
    pub b_start: usize,
    /// End of the overlap in `b` (exclusive)
    pub b_end: usize,
    /// Alignment score of the overlap
    pub score: i32,
    /// Columns of the overlap, in order
    pub ops: Vec<AlignOp>,
    /// Number of matching columns
    pub matches: usize,
}

impl AlignmentResult {
    /// Number of columns in the overlap, internal gaps included.
    #[must_use]
    pub fn overlap_length(&self) -> usize {
        self.ops.len()
    }

    /// Fraction of overlap columns that match, in `[0, 1]`; zero for an empty overlap.
    #[must_use]
    pub fn percent_identity(&self) -> f64 {
        if self.ops.is_empty() { 0.0 } else { self.matches as f64 / self.ops.len() as f64 }
    }
}

/// Errors preventing an alignment or fusion from being computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    /// One of the sequences had no bases
    #[error("cannot align an empty sequence ({which})")]
    EmptySequence {
        /// Which input was empty
        which: &'static str,
    },

    /// Bases and qualities of one input differ in length
    #[error("{which} has {bases} bases but {quals} qualities")]
    QualityLengthMismatch {
        /// Which input was inconsistent
        which: &'static str,
        /// Number of bases
        bases: usize,
        /// Number of qualities
        quals: usize,
    },

    /// The alignment does not describe the sequences it was applied to
    #[error("alignment does not fit the sequences: {reason}")]
    InconsistentAlignment {
        /// What did not fit
        reason: String,
    },
}

/// Reusable overlap aligner.
///
/// Holds a scratch score matrix that grows to the largest pair seen, so a worker thread can
/// align many pairs without reallocating.
#[derive(Debug, Clone)]
pub struct OverlapAligner {
    scoring: AlignmentScoring,
    matrix: Vec<i32>,
}

impl OverlapAligner {
    /// Creates an aligner with the given scoring.
    #[must_use]
    pub fn new(scoring: AlignmentScoring) -> Self {
        Self { scoring, matrix: Vec::new() }
    }

    /// Scoring used by this aligner.
    #[must_use]
    pub fn scoring(&self) -> &AlignmentScoring {
        &self.scoring
    }

    /// Finds the best-scoring overlap of `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError::EmptySequence`] if either input has no bases.
    pub fn align(&mut self, a: &[u8], b: &[u8]) -> Result<AlignmentResult, AlignmentError> {
        if a.is_empty() {
            return Err(AlignmentError::EmptySequence { which: "first read" });
        }
        if b.is_empty() {
            return Err(AlignmentError::EmptySequence { which: "second read" });
        }

        let rows = a.len() + 1;
        let cols = b.len() + 1;
        self.matrix.clear();
        self.matrix.resize(rows * cols, 0);
        self.fill(a, b, cols);

        let (end_i, end_j) = self.best_end_cell(rows, cols);
        let score = self.matrix[end_i * cols + end_j];
        let (start_i, start_j, ops) = self.traceback(a, b, cols, end_i, end_j);
        let matches = ops.iter().filter(|&&op| op == AlignOp::Match).count();

        Ok(AlignmentResult {
            a_start: start_i,
            a_end: end_i,
            b_start: start_j,
            b_end: end_j,
            score,
            ops,
            matches,
        })
    }

    /// Fills the score matrix; the first row and column stay zero (free leading gaps).
    fn fill(&mut self, a: &[u8], b: &[u8], cols: usize) {
        let s = self.scoring;
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                let diag = self.matrix[(i - 1) * cols + j - 1]
                    .saturating_add(s.substitution(a[i - 1], b[j - 1]));
                let up = self.matrix[(i - 1) * cols + j].saturating_add(s.gap_penalty);
                let left = self.matrix[i * cols + j - 1].saturating_add(s.gap_penalty);
                self.matrix[i * cols + j] = diag.max(up).max(left);
            }
        }
    }

    /// Picks the end cell on the last row or column (free trailing gaps).
    fn best_end_cell(&self, rows: usize, cols: usize) -> (usize, usize) {
        let last_i = rows - 1;
        let last_j = cols - 1;
        let mut best = (last_i, last_j);
        let mut best_score = self.matrix[last_i * cols + last_j];

        let last_column = (0..last_i).rev().map(|i| (i, last_j));
        let last_row = (0..last_j).rev().map(|j| (last_i, j));
        for (i, j) in last_column.chain(last_row) {
            let score = self.matrix[i * cols + j];
            if score > best_score {
                best_score = score;
                best = (i, j);
            }
        }
        best
    }

    /// Walks back from the end cell to the first row or column.
    fn traceback(
        &self,
        a: &[u8],
        b: &[u8],
        cols: usize,
        end_i: usize,
        end_j: usize,
    ) -> (usize, usize, Vec<AlignOp>) {
        let s = self.scoring;
        let mut ops = Vec::with_capacity(end_i.max(end_j));
        let (mut i, mut j) = (end_i, end_j);

        while i > 0 && j > 0 {
            let here = self.matrix[i * cols + j];
            let (x, y) = (a[i - 1], b[j - 1]);
            let compatible = bases_compatible(x, y);
            let diag = self.matrix[(i - 1) * cols + j - 1].saturating_add(s.substitution(x, y));
            if here == diag {
                ops.push(if compatible { AlignOp::Match } else { AlignOp::Mismatch });
                i -= 1;
                j -= 1;
            } else if here == self.matrix[(i - 1) * cols + j].saturating_add(s.gap_penalty) {
                ops.push(AlignOp::GapInB);
                i -= 1;
            } else {
                ops.push(AlignOp::GapInA);
                j -= 1;
            }
        }

        ops.reverse();
        (i, j, ops)
    }
}

/// Aligns two sequences with a one-off aligner.
///
/// # Errors
///
/// Returns [`AlignmentError::EmptySequence`] if either input has no bases.
///
/// # Examples
///
/// ```
/// use fgmerge_lib::merge::aligner::{AlignmentScoring, align};
///
/// let result = align(b"AAAACGTACGTA", b"CGTACGTATTTT", &AlignmentScoring::default()).unwrap();
/// assert_eq!((result.a_start, result.a_end), (4, 12));
/// assert_eq!((result.b_start, result.b_end), (0, 8));
/// assert_eq!(result.overlap_length(), 8);
/// assert!((result.percent_identity() - 1.0).abs() < f64::EPSILON);
/// ```
pub fn align(
    a: &[u8],
    b: &[u8],
    scoring: &AlignmentScoring,
) -> Result<AlignmentResult, AlignmentError> {
    OverlapAligner::new(*scoring).align(a, b)
}
