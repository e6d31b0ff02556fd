#![deny(unsafe_code)]

//! DNA alphabet utilities and constants.
//!
//! This crate provides the nucleotide operations needed to merge read pairs:
//! - Complement and reverse-complement over the full IUPAC alphabet
//! - Classification of ambiguity codes and wildcard base compatibility
//! - Phred quality bounds shared by the merger and its CLI

pub mod dna;

// Re-export submodule contents at crate root for convenience
pub use dna::{bases_compatible, complement_base, is_ambiguous, reverse_complement};

/// Minimum Phred score emitted by quality fusion (Q2).
pub const MIN_PHRED: u8 = 2;

/// Maximum Phred score representable in Phred+33 FASTQ (Q93).
pub const MAX_PHRED: u8 = 93;
