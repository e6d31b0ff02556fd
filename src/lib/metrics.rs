//! Metrics types and TSV output.
//!
//! Re-exports the `fgmerge-metrics` workspace crate so callers can reach everything through
//! `fgmerge_lib::metrics`.

pub use fgmerge_metrics::{Metric, ProcessingMetrics};

pub use fgmerge_metrics::merge;
pub use fgmerge_metrics::rejection;
pub use fgmerge_metrics::writer;

pub use merge::MergeMetrics;
pub use rejection::{RejectionReason, format_count};
pub use writer::{write_metrics, write_metrics_auto};
