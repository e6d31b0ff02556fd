//! CLI command implementations for fgmerge.
//!
//! - [`merge`] - Merge overlapping read pairs from paired FASTQ files
//! - [`quality_table`] - Write the merged-base quality table as TSV

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

pub mod command;
pub mod common;
pub mod merge;
pub mod quality_table;
