//! Precomputed posterior qualities for overlapping bases.
//!
//! When both reads cover a position, the merged base quality is the posterior probability
//! that the reported base is wrong given the two observations. Bases are assumed to be
//! drawn uniformly from the three alternatives when a read is in error.
//!
//! For two agreeing bases with error rates `e1` and `e2`:
//!
//! ```text
//! P(error) = (e1 * e2 / 3) / ((1 - e1) * (1 - e2) + e1 * e2 / 3)
//! ```
//!
//! For two disagreeing bases the reported base `X` comes from the higher-quality read
//! (error `e1`) and the other read reports `Y` (error `e2`). The true base is `X`, `Y` or one
//! of the two remaining bases, with likelihoods:
//!
//! ```text
//! L(X) = (1 - e1) * e2 / 3
//! L(Y) = e1 * (1 - e2) / 3
//! L(other) = 2 * e1 * e2 / 9
//! P(error) = 1 - L(X) / (L(X) + L(Y) + L(other))
//! ```
//!
//! Every `(q1, q2, match)` combination up to the configured maximum is computed once at
//! construction; lookups are two index operations. Inputs above the maximum are looked up at
//! the maximum, and an agreeing pair never fuses below the better of its two input qualities.

use std::f64::consts::LN_2;
use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::{Deserialize, Serialize};

use crate::errors::FgmergeError;
use crate::phred::{
    LogProbability, MAX_PHRED, MIN_PHRED, PhredScore, ln_prob_to_phred, ln_sum_exp,
    ln_sum_exp_all, phred_to_ln_correct_prob, phred_to_ln_error_prob,
};

/// Natural log of 3, the number of wrong bases a sequencing error can produce
const LN_THREE: f64 = 1.098_612_288_668_109_8;

/// One row of a persisted quality table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityTableEntry {
    /// Quality of the base from the first read
    pub qual_a: u8,
    /// Quality of the base from the second read
    pub qual_b: u8,
    /// Whether the two bases agree
    pub is_match: bool,
    /// Quality assigned to the merged base
    pub fused: u8,
}

/// Immutable lookup table from `(qual_a, qual_b, is_match)` to merged base quality.
///
/// Inputs above [`QualityScoreTable::max_quality`] are treated as the maximum. The table
/// is built once and shared read-only (typically behind an `Arc`) by all workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityScoreTable {
    max_quality: u8,
    width: usize,
    match_quals: Vec<u8>,
    mismatch_quals: Vec<u8>,
}

impl Default for QualityScoreTable {
    fn default() -> Self {
        Self::posterior(MAX_PHRED)
    }
}

impl QualityScoreTable {
    /// Builds the table from the posterior model for qualities `0..=max_quality`.
    ///
    /// `max_quality` is clamped to `[MIN_PHRED, MAX_PHRED]`; use
    /// [`QualityScoreTable::try_posterior`] to reject out-of-range values instead.
    #[must_use]
    pub fn posterior(max_quality: u8) -> Self {
        let max_quality = max_quality.clamp(MIN_PHRED, MAX_PHRED);
        let width = usize::from(max_quality) + 1;
        let mut match_quals = Vec::with_capacity(width * width);
        let mut mismatch_quals = Vec::with_capacity(width * width);

        for qa in 0..=max_quality {
            for qb in 0..=max_quality {
                match_quals.push(to_capped_phred(ln_error_agreeing(qa, qb), max_quality));
                mismatch_quals.push(to_capped_phred(ln_error_disagreeing(qa, qb), max_quality));
            }
        }

        Self { max_quality, width, match_quals, mismatch_quals }
    }

    /// Builds the posterior table, rejecting a maximum outside `[MIN_PHRED, MAX_PHRED]`.
    pub fn try_posterior(max_quality: u8) -> crate::errors::Result<Self> {
        validate_max_quality(max_quality)?;
        Ok(Self::posterior(max_quality))
    }

    /// Highest quality the table distinguishes; also the cap on qualities raised by agreement.
    #[must_use]
    pub fn max_quality(&self) -> u8 {
        self.max_quality
    }

    /// Quality of a merged base from two observations with qualities `qual_a` and `qual_b`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fgmerge_lib::merge::QualityScoreTable;
    ///
    /// let table = QualityScoreTable::posterior(60);
    /// assert!(table.fused(30, 30, true) > 30);
    /// assert!(table.fused(30, 30, false) < 30);
    /// assert_eq!(table.fused(30, 20, true), table.fused(20, 30, true));
    /// // Agreement above the table maximum keeps the better input quality
    /// assert_eq!(table.fused(70, 65, true), 70);
    /// ```
    #[inline]
    #[must_use]
    pub fn fused(&self, qual_a: u8, qual_b: u8, is_match: bool) -> u8 {
        let stored = self.stored(qual_a, qual_b, is_match);
        if is_match { stored.max(qual_a.max(qual_b)) } else { stored }
    }

    /// Table value for the pair, with inputs clamped to the maximum.
    #[inline]
    fn stored(&self, qual_a: u8, qual_b: u8, is_match: bool) -> u8 {
        let idx = self.index(qual_a, qual_b);
        if is_match { self.match_quals[idx] } else { self.mismatch_quals[idx] }
    }

    #[inline]
    fn index(&self, qual_a: u8, qual_b: u8) -> usize {
        let qa = usize::from(qual_a.min(self.max_quality));
        let qb = usize::from(qual_b.min(self.max_quality));
        qa * self.width + qb
    }

    /// All entries of the table, agreeing bases first, ordered by `qual_a` then `qual_b`.
    pub fn entries(&self) -> impl Iterator<Item = QualityTableEntry> + '_ {
        [true, false].into_iter().flat_map(move |is_match| {
            (0..=self.max_quality).flat_map(move |qual_a| {
                (0..=self.max_quality).map(move |qual_b| QualityTableEntry {
                    qual_a,
                    qual_b,
                    is_match,
                    fused: self.stored(qual_a, qual_b, is_match),
                })
            })
        })
    }

    /// Builds a table from explicit entries.
    ///
    /// The maximum quality is the largest quality seen, and every combination of
    /// `qual_a`, `qual_b` in `0..=max` and both match states must be present exactly once.
    /// `source` names the origin of the entries in error messages.
    pub fn from_entries(
        entries: &[QualityTableEntry],
        source: &str,
    ) -> crate::errors::Result<Self> {
        let invalid = |reason: String| FgmergeError::InvalidFileFormat {
            file_type: "quality table".to_string(),
            path: source.to_string(),
            reason,
        };

        let max_quality = entries
            .iter()
            .map(|e| e.qual_a.max(e.qual_b))
            .max()
            .ok_or_else(|| invalid("table has no entries".to_string()))?;
        validate_max_quality(max_quality).map_err(|e| invalid(e.to_string()))?;

        let width = usize::from(max_quality) + 1;
        let mut match_quals: Vec<Option<u8>> = vec![None; width * width];
        let mut mismatch_quals: Vec<Option<u8>> = vec![None; width * width];

        for entry in entries {
            if entry.fused > max_quality {
                return Err(invalid(format!(
                    "fused quality {} for ({}, {}) exceeds the table maximum {max_quality}",
                    entry.fused, entry.qual_a, entry.qual_b
                )));
            }
            let idx = usize::from(entry.qual_a) * width + usize::from(entry.qual_b);
            let slot =
                if entry.is_match { &mut match_quals[idx] } else { &mut mismatch_quals[idx] };
            if slot.replace(entry.fused).is_some() {
                return Err(invalid(format!(
                    "duplicate entry for qual_a={} qual_b={} is_match={}",
                    entry.qual_a, entry.qual_b, entry.is_match
                )));
            }
        }

        let complete = |values: Vec<Option<u8>>, is_match: bool| {
            values
                .into_iter()
                .enumerate()
                .map(|(idx, value)| {
                    value.ok_or_else(|| {
                        invalid(format!(
                            "missing entry for qual_a={} qual_b={} is_match={is_match}",
                            idx / width,
                            idx % width
                        ))
                    })
                })
                .collect::<crate::errors::Result<Vec<u8>>>()
        };

        Ok(Self {
            max_quality,
            width,
            match_quals: complete(match_quals, true)?,
            mismatch_quals: complete(mismatch_quals, false)?,
        })
    }

    /// Reads a table previously written with [`QualityScoreTable::write_tsv`].
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let entries: Vec<QualityTableEntry> = DelimFile::default()
            .read_tsv(&path)
            .with_context(|| format!("Failed to read quality table: {}", path.display()))?;
        Ok(Self::from_entries(&entries, &path.display().to_string())?)
    }

    /// Writes the table as TSV with columns `qual_a`, `qual_b`, `is_match`, `fused`.
    pub fn write_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let entries: Vec<QualityTableEntry> = self.entries().collect();
        DelimFile::default()
            .write_tsv(&path, entries)
            .with_context(|| format!("Failed to write quality table: {}", path.display()))
    }
}

fn validate_max_quality(max_quality: u8) -> crate::errors::Result<()> {
    if (MIN_PHRED..=MAX_PHRED).contains(&max_quality) {
        Ok(())
    } else {
        Err(FgmergeError::InvalidQuality { value: max_quality, min: MIN_PHRED, max: MAX_PHRED })
    }
}

#[inline]
fn to_capped_phred(ln_error: LogProbability, max_quality: u8) -> PhredScore {
    ln_prob_to_phred(ln_error).min(max_quality)
}

/// Log posterior error of a base reported identically by both reads.
fn ln_error_agreeing(qual_a: u8, qual_b: u8) -> LogProbability {
    let both_wrong =
        phred_to_ln_error_prob(qual_a) + phred_to_ln_error_prob(qual_b) - LN_THREE;
    let both_right = phred_to_ln_correct_prob(qual_a) + phred_to_ln_correct_prob(qual_b);
    both_wrong - ln_sum_exp(both_right, both_wrong)
}

/// Log posterior error of the higher-quality base when the reads disagree.
fn ln_error_disagreeing(qual_a: u8, qual_b: u8) -> LogProbability {
    let (hi, lo) = if qual_a >= qual_b { (qual_a, qual_b) } else { (qual_b, qual_a) };
    let (err_hi, err_lo) = (phred_to_ln_error_prob(hi), phred_to_ln_error_prob(lo));

    let reported = phred_to_ln_correct_prob(hi) + err_lo - LN_THREE;
    let other_read = err_hi + phred_to_ln_correct_prob(lo) - LN_THREE;
    let neither = LN_2 + err_hi + err_lo - 2.0 * LN_THREE;

    let total = ln_sum_exp_all(&[reported, other_read, neither]);
    ln_sum_exp(other_read, neither) - total
}
