//! Phred quality scores and log-space probability arithmetic.
//!
//! Qualities are handled numerically everywhere inside the library; the Phred+33 ASCII
//! encoding only exists at the FASTQ boundary ([`decode_phred33`] and [`encode_phred33`]).
//! Probabilities are carried as natural logs so that products of many small error rates
//! never underflow.

use std::f64::consts::{LN_2, LN_10};

pub use fgmerge_dna::{MAX_PHRED, MIN_PHRED};

/// ASCII offset of Sanger / Illumina 1.8+ quality encoding.
pub const PHRED33_OFFSET: u8 = 33;

/// Added before flooring so that exact powers of ten map onto their integer Phred score.
const PHRED_PRECISION: f64 = 0.001;

/// Phred score type
pub type PhredScore = u8;

/// Log probability type (natural log)
pub type LogProbability = f64;

/// Converts a Phred score to the natural log of its error probability.
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::phred_to_ln_error_prob;
///
/// assert!((phred_to_ln_error_prob(10) - 0.1_f64.ln()).abs() < 1e-10);
/// assert!((phred_to_ln_error_prob(30) - 0.001_f64.ln()).abs() < 1e-10);
/// ```
#[inline]
#[must_use]
pub fn phred_to_ln_error_prob(phred: PhredScore) -> LogProbability {
    -f64::from(phred) * LN_10 / 10.0
}

/// Converts a Phred score to the natural log of the probability that the base is correct.
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::phred_to_ln_correct_prob;
///
/// assert!((phred_to_ln_correct_prob(20) - 0.99_f64.ln()).abs() < 1e-6);
/// ```
#[inline]
#[must_use]
pub fn phred_to_ln_correct_prob(phred: PhredScore) -> LogProbability {
    ln_not(phred_to_ln_error_prob(phred))
}

/// Converts a log error probability to a Phred score in `[MIN_PHRED, MAX_PHRED]`.
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::ln_prob_to_phred;
///
/// assert_eq!(ln_prob_to_phred(0.01_f64.ln()), 20);
/// assert_eq!(ln_prob_to_phred(0.5_f64.ln()), 3);
/// assert_eq!(ln_prob_to_phred(1e-20_f64.ln()), 93);
/// assert_eq!(ln_prob_to_phred(0.0), 2);
/// ```
#[inline]
#[must_use]
pub fn ln_prob_to_phred(ln_prob: LogProbability) -> PhredScore {
    if ln_prob < phred_to_ln_error_prob(MAX_PHRED) {
        return MAX_PHRED;
    }
    let phred = (-10.0 * ln_prob / LN_10 + PHRED_PRECISION).floor();
    phred.clamp(f64::from(MIN_PHRED), f64::from(MAX_PHRED)) as PhredScore
}

/// Precise `ln(1 + e^x)`, following Mächler's log1mexp note (equation 10).
#[inline]
fn log1pexp(x: f64) -> f64 {
    if x <= -37.0 {
        x.exp()
    } else if x <= 18.0 {
        x.exp().ln_1p()
    } else if x <= 33.3 {
        x + (-x).exp()
    } else {
        x
    }
}

/// Computes `ln(1 - e^x)` for `x <= 0`; returns negative infinity for `x >= 0`.
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::ln_not;
///
/// assert!((ln_not(0.25_f64.ln()) - 0.75_f64.ln()).abs() < 1e-12);
/// assert!(ln_not(0.0).is_infinite());
/// ```
#[inline]
#[must_use]
pub fn ln_not(x: LogProbability) -> LogProbability {
    if x >= 0.0 {
        f64::NEG_INFINITY
    } else if x >= -LN_2 {
        (-x.exp_m1()).ln()
    } else {
        (-x.exp()).ln_1p()
    }
}

/// Computes `ln(e^a + e^b)` without leaving log space.
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::ln_sum_exp;
///
/// let result = ln_sum_exp(0.1_f64.ln(), 0.2_f64.ln());
/// assert!((result - 0.3_f64.ln()).abs() < 1e-10);
/// ```
#[must_use]
pub fn ln_sum_exp(ln_a: LogProbability, ln_b: LogProbability) -> LogProbability {
    if ln_a == f64::NEG_INFINITY {
        return ln_b;
    }
    if ln_b == f64::NEG_INFINITY {
        return ln_a;
    }
    let (lo, hi) = if ln_b < ln_a { (ln_b, ln_a) } else { (ln_a, ln_b) };
    lo + log1pexp(hi - lo)
}

/// Computes `ln(sum(e^v))` over a slice; zero-probability terms are ignored.
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::ln_sum_exp_all;
///
/// let values = [0.1_f64.ln(), 0.2_f64.ln(), f64::NEG_INFINITY, 0.3_f64.ln()];
/// assert!((ln_sum_exp_all(&values) - 0.6_f64.ln()).abs() < 1e-10);
/// assert!(ln_sum_exp_all(&[]).is_infinite());
/// ```
#[must_use]
pub fn ln_sum_exp_all(values: &[LogProbability]) -> LogProbability {
    values.iter().fold(f64::NEG_INFINITY, |acc, &v| ln_sum_exp(acc, v))
}

/// Decodes Phred+33 ASCII qualities into numeric scores.
///
/// Returns the offending byte when a character lies below `'!'`.
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::decode_phred33;
///
/// assert_eq!(decode_phred33(b"!+5I"), Ok(vec![0, 10, 20, 40]));
/// assert_eq!(decode_phred33(b"I I"), Err(b' '));
/// ```
pub fn decode_phred33(encoded: &[u8]) -> std::result::Result<Vec<PhredScore>, u8> {
    encoded.iter().map(|&c| c.checked_sub(PHRED33_OFFSET).ok_or(c)).collect()
}

/// Encodes numeric scores as Phred+33 ASCII, capping at [`MAX_PHRED`].
///
/// # Examples
/// ```
/// use fgmerge_lib::phred::encode_phred33;
///
/// assert_eq!(encode_phred33(&[0, 10, 20, 40]), b"!+5I".to_vec());
/// assert_eq!(encode_phred33(&[200]), b"~".to_vec());
/// ```
#[must_use]
pub fn encode_phred33(quals: &[PhredScore]) -> Vec<u8> {
    quals.iter().map(|&q| q.min(MAX_PHRED) + PHRED33_OFFSET).collect()
}
