//! Error types for fgmerge configuration and input problems.
//!
//! Per-pair problems (a pair that cannot be aligned, mates that do not match) are not errors
//! of the run; they are reported as outcomes by [`crate::merge::processor`]. The variants
//! here describe problems that stop a run before or while it starts.

use thiserror::Error;

/// Result type alias for fgmerge operations
pub type Result<T> = std::result::Result<T, FgmergeError>;

/// Error type for fgmerge operations
#[derive(Error, Debug)]
pub enum FgmergeError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// A fraction-valued parameter outside of its allowed range
    #[error("Invalid {parameter}: {value} (must be between {min} and {max})")]
    InvalidFraction {
        /// The parameter name
        parameter: String,
        /// The invalid value
        value: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Invalid quality score
    #[error("Invalid quality score: {value} (must be between {min} and {max})")]
    InvalidQuality {
        /// The invalid quality value
        value: u8,
        /// Minimum valid value
        min: u8,
        /// Maximum valid value
        max: u8,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "FASTQ", "quality table")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// The worker pool could not be started
    #[error("Failed to start a pool of {threads} worker threads: {reason}")]
    ThreadPool {
        /// Requested number of threads
        threads: usize,
        /// Error reported by the pool builder
        reason: String,
    },
}
