//! Integration tests for the fgmerge binary.
//!
//! These tests run the binary end to end on small FASTQ files and check its outputs,
//! metrics, and failure modes.

mod helpers;
mod test_error_paths;
mod test_merge_command;
mod test_quality_table_command;
