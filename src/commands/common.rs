//! Common CLI options shared across commands.
//!
//! Argument groups here are composed into command structs with `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use fgmerge_lib::merge::{AlignmentScoring, MergeParams};
use fgmerge_lib::validation::{validate_distinct_paths, validate_files_exist};

/// Paired FASTQ inputs.
#[derive(Debug, Clone, Args)]
pub struct PairedInputOptions {
    /// Input FASTQ with the first read of each pair
    #[arg(short = '1', long = "r1")]
    pub r1: PathBuf,

    /// Input FASTQ with the second read of each pair, in the same order as --r1
    #[arg(short = '2', long = "r2")]
    pub r2: PathBuf,
}

impl PairedInputOptions {
    /// Validates that both inputs exist and are different files.
    ///
    /// # Errors
    ///
    /// Returns an error if either input is missing or both name the same path.
    pub fn validate(&self) -> anyhow::Result<()> {
        let inputs = [(&self.r1, "R1 FASTQ"), (&self.r2, "R2 FASTQ")];
        validate_files_exist(&inputs)?;
        validate_distinct_paths(&inputs)?;
        Ok(())
    }
}

/// Alignment scores and acceptance thresholds.
#[derive(Debug, Clone, Args)]
pub struct MergeOptions {
    /// Score for two compatible bases (1 to 10000)
    #[arg(long = "match-score", default_value_t = 5, allow_negative_numbers = true)]
    pub match_score: i32,

    /// Score for two incompatible bases (-10000 to -1)
    #[arg(long = "mismatch-score", default_value_t = -5, allow_negative_numbers = true)]
    pub mismatch_score: i32,

    /// Score for a gap inside the overlap (-10000 to -1)
    #[arg(long = "gap-penalty", default_value_t = -7, allow_negative_numbers = true)]
    pub gap_penalty: i32,

    /// Minimum fraction of overlap columns that must match to merge a pair (0.0-1.0)
    #[arg(short = 's', long = "min-similarity", default_value_t = 0.9)]
    pub min_similarity: f64,

    /// Minimum overlap length, in alignment columns, to merge a pair
    #[arg(short = 'l', long = "min-alignment-length", default_value_t = 10)]
    pub min_alignment_length: usize,

    /// Align R2 as given instead of reverse complementing it first
    #[arg(long = "no-reverse-complement", default_value = "false")]
    pub no_reverse_complement: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        let params = MergeParams::default();
        Self {
            match_score: params.scoring.match_score,
            mismatch_score: params.scoring.mismatch_score,
            gap_penalty: params.scoring.gap_penalty,
            min_similarity: params.min_similarity,
            min_alignment_length: params.min_alignment_length,
            no_reverse_complement: !params.reverse_complement_second_read,
        }
    }
}

impl MergeOptions {
    /// Builds merge parameters for `worker_count` workers and the given quality cap.
    ///
    /// The parameters are not validated here.
    #[must_use]
    pub fn to_params(&self, worker_count: usize, max_quality: u8) -> MergeParams {
        MergeParams {
            scoring: AlignmentScoring {
                match_score: self.match_score,
                mismatch_score: self.mismatch_score,
                gap_penalty: self.gap_penalty,
            },
            min_similarity: self.min_similarity,
            min_alignment_length: self.min_alignment_length,
            reverse_complement_second_read: !self.no_reverse_complement,
            worker_count,
            max_quality,
        }
    }
}

/// Worker pool size.
#[derive(Debug, Clone, Args)]
pub struct ThreadingOptions {
    /// Number of worker threads used to merge pairs
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    pub threads: usize,
}

/// Optional metrics output.
#[derive(Debug, Clone, Default, Args)]
pub struct MetricsOptions {
    /// Optional output TSV for run metrics
    #[arg(short = 'm', long = "metrics")]
    pub metrics: Option<PathBuf>,
}

impl MetricsOptions {
    /// Returns true if metrics output is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.metrics.is_some()
    }
}
