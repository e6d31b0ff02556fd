//! Builds the merged read from two aligned mates.
//!
//! The merged read is the leading flank (from whichever read extends past the start of the
//! overlap), then one base per overlap column, then the trailing flank (from whichever read
//! extends past the end of the overlap). Flank bases and qualities are copied unchanged.
//!
//! Within the overlap:
//!
//! - agreeing bases emit the concrete base (preferring a concrete base over an ambiguity
//!   code) with the posterior quality for agreement;
//! - disagreeing bases emit the base of the higher-quality read (the first read on a tie)
//!   with the posterior quality for disagreement;
//! - a base opposite a gap is copied with its own quality.

use fgmerge_dna::is_ambiguous;

use super::aligner::{AlignOp, AlignmentError, AlignmentResult};
use super::quality_table::QualityScoreTable;

/// Bases and qualities of a merged read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FusedRead {
    /// Merged bases
    pub bases: Vec<u8>,
    /// Merged numeric qualities, one per base
    pub quals: Vec<u8>,
}

impl FusedRead {
    /// Number of bases in the merged read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Returns true if the merged read has no bases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Merges two reads along `alignment`, which must have been computed on `seq_a` and `seq_b`.
///
/// # Errors
///
/// Returns an error if the qualities do not match their sequences in length or the
/// alignment coordinates do not fit the sequences.
///
/// # Examples
///
/// ```
/// use fgmerge_lib::merge::aligner::{AlignmentScoring, align};
/// use fgmerge_lib::merge::fuser::fuse;
/// use fgmerge_lib::merge::QualityScoreTable;
///
/// let (a, b) = (b"TTTTACGTACGT", b"ACGTACGTGGGG");
/// let alignment = align(a, b, &AlignmentScoring::default()).unwrap();
/// let table = QualityScoreTable::posterior(60);
/// let fused = fuse(a, &[30; 12], b, &[30; 12], &alignment, &table).unwrap();
/// assert_eq!(fused.bases, b"TTTTACGTACGTGGGG".to_vec());
/// assert_eq!(fused.quals.len(), fused.bases.len());
/// ```
pub fn fuse(
    seq_a: &[u8],
    qual_a: &[u8],
    seq_b: &[u8],
    qual_b: &[u8],
    alignment: &AlignmentResult,
    table: &QualityScoreTable,
) -> Result<FusedRead, AlignmentError> {
    check_lengths("first read", seq_a, qual_a)?;
    check_lengths("second read", seq_b, qual_b)?;
    check_alignment(alignment, seq_a.len(), seq_b.len())?;

    let capacity = alignment.a_start
        + alignment.b_start
        + alignment.overlap_length()
        + (seq_a.len() - alignment.a_end)
        + (seq_b.len() - alignment.b_end);
    let mut bases = Vec::with_capacity(capacity);
    let mut quals = Vec::with_capacity(capacity);

    if alignment.a_start > 0 {
        bases.extend_from_slice(&seq_a[..alignment.a_start]);
        quals.extend_from_slice(&qual_a[..alignment.a_start]);
    } else {
        bases.extend_from_slice(&seq_b[..alignment.b_start]);
        quals.extend_from_slice(&qual_b[..alignment.b_start]);
    }

    let (mut i, mut j) = (alignment.a_start, alignment.b_start);
    for &op in &alignment.ops {
        match op {
            AlignOp::Match => {
                let (x, y) = (seq_a[i], seq_b[j]);
                bases.push(if is_ambiguous(x) && !is_ambiguous(y) { y } else { x });
                quals.push(table.fused(qual_a[i], qual_b[j], true));
            }
            AlignOp::Mismatch => {
                let base = if qual_b[j] > qual_a[i] { seq_b[j] } else { seq_a[i] };
                bases.push(base);
                quals.push(table.fused(qual_a[i], qual_b[j], false));
            }
            AlignOp::GapInB => {
                bases.push(seq_a[i]);
                quals.push(qual_a[i]);
            }
            AlignOp::GapInA => {
                bases.push(seq_b[j]);
                quals.push(qual_b[j]);
            }
        }
        i += op.consumes_a();
        j += op.consumes_b();
    }

    if alignment.a_end < seq_a.len() {
        bases.extend_from_slice(&seq_a[alignment.a_end..]);
        quals.extend_from_slice(&qual_a[alignment.a_end..]);
    } else {
        bases.extend_from_slice(&seq_b[alignment.b_end..]);
        quals.extend_from_slice(&qual_b[alignment.b_end..]);
    }

    Ok(FusedRead { bases, quals })
}

fn check_lengths(which: &'static str, seq: &[u8], qual: &[u8]) -> Result<(), AlignmentError> {
    if seq.len() == qual.len() {
        Ok(())
    } else {
        Err(AlignmentError::QualityLengthMismatch { which, bases: seq.len(), quals: qual.len() })
    }
}

fn check_alignment(
    alignment: &AlignmentResult,
    len_a: usize,
    len_b: usize,
) -> Result<(), AlignmentError> {
    let inconsistent = |reason: String| Err(AlignmentError::InconsistentAlignment { reason });

    if alignment.a_start > alignment.a_end || alignment.a_end > len_a {
        return inconsistent(format!(
            "first read range {}..{} outside 0..{len_a}",
            alignment.a_start, alignment.a_end
        ));
    }
    if alignment.b_start > alignment.b_end || alignment.b_end > len_b {
        return inconsistent(format!(
            "second read range {}..{} outside 0..{len_b}",
            alignment.b_start, alignment.b_end
        ));
    }
    if alignment.a_start > 0 && alignment.b_start > 0 {
        return inconsistent("both reads have a leading flank".to_string());
    }
    if alignment.a_end < len_a && alignment.b_end < len_b {
        return inconsistent("both reads have a trailing flank".to_string());
    }

    let used_a: usize = alignment.ops.iter().map(|op| op.consumes_a()).sum();
    let used_b: usize = alignment.ops.iter().map(|op| op.consumes_b()).sum();
    if used_a != alignment.a_end - alignment.a_start || used_b != alignment.b_end - alignment.b_start
    {
        return inconsistent(format!(
            "overlap columns consume {used_a} and {used_b} bases but the ranges span {} and {}",
            alignment.a_end - alignment.a_start,
            alignment.b_end - alignment.b_start
        ));
    }
    Ok(())
}
