//! Rejection reason tracking for read pairs.
//!
//! Every read pair that does not produce a merged read is classified with one or more
//! [`RejectionReason`]s so the run summary can account for each input pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasons why a read pair did not produce a merged read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Overlap percent identity was below the minimum similarity
    BelowSimilarity,
    /// Overlap was shorter than the minimum alignment length
    BelowLength,
    /// The alignment or fusion could not be computed for the pair
    ComputationFailed,
    /// The mates were mismatched, missing, or internally inconsistent
    MalformedPair,
}

impl RejectionReason {
    /// All reasons in reporting order.
    pub const ALL: [RejectionReason; 4] =
        [Self::BelowSimilarity, Self::BelowLength, Self::ComputationFailed, Self::MalformedPair];

    /// Returns a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::BelowSimilarity => "Overlap identity below minimum similarity",
            Self::BelowLength => "Overlap shorter than minimum alignment length",
            Self::ComputationFailed => "Alignment could not be computed",
            Self::MalformedPair => "Mates were missing or mismatched",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use fgmerge_metrics::rejection::format_count;
///
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(123), "123");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
