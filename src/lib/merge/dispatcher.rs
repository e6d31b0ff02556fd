//! Parallel execution of read-pair batches.
//!
//! A batch is split across a dedicated rayon pool. Every worker keeps its own
//! [`OverlapAligner`] scratch space; the [`PairMerger`] and its quality table are shared
//! read-only. Each input yields exactly one [`TaggedOutcome`] carrying its submission index,
//! so callers can restore input order regardless of which worker finished first.

use std::panic::{AssertUnwindSafe, catch_unwind};

use rayon::prelude::*;

use super::aligner::OverlapAligner;
use super::processor::{PairError, PairMerger, PairOutcome};
use super::stats::RejectionTally;
use crate::errors::{FgmergeError, Result};
use crate::read_pair::PairInput;

/// Outcome of one input, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedOutcome {
    /// Position of the input within its batch
    pub index: usize,
    /// Identifier of the input pair
    pub id: String,
    /// What happened to the pair
    pub outcome: PairOutcome,
}

/// A worker pool for merging batches of pairs.
pub struct ParallelDispatcher {
    pool: rayon::ThreadPool,
    worker_count: usize,
}

impl std::fmt::Debug for ParallelDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelDispatcher").field("worker_count", &self.worker_count).finish()
    }
}

impl ParallelDispatcher {
    /// Starts a pool of `worker_count` threads.
    ///
    /// # Errors
    ///
    /// Returns an error if `worker_count` is zero or the pool cannot be started.
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(FgmergeError::InvalidParameter {
                parameter: "worker-count".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("fgmerge-worker-{i}"))
            .build()
            .map_err(|e| FgmergeError::ThreadPool {
                threads: worker_count,
                reason: e.to_string(),
            })?;
        Ok(Self { pool, worker_count })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Processes every input, returning one tagged outcome per input in submission order.
    ///
    /// A pair that panics inside the merger is reported as a failed computation; the rest of
    /// the batch is unaffected.
    pub fn run_batch(&self, merger: &PairMerger, inputs: &[PairInput]) -> Vec<TaggedOutcome> {
        self.pool.install(|| {
            inputs
                .par_iter()
                .enumerate()
                .map_init(
                    || merger.aligner(),
                    |aligner, (index, input)| TaggedOutcome {
                        index,
                        id: input.id().to_string(),
                        outcome: process_isolated(merger, aligner, input),
                    },
                )
                .collect()
        })
    }

    /// Folds outcomes into a tally, one partial tally per worker merged at the end.
    #[must_use]
    pub fn tally(&self, outcomes: &[TaggedOutcome]) -> RejectionTally {
        self.pool.install(|| {
            outcomes
                .par_iter()
                .fold(RejectionTally::default, |mut tally, tagged| {
                    tally.record(&tagged.outcome);
                    tally
                })
                .reduce(RejectionTally::default, |mut left, right| {
                    left.merge(&right);
                    left
                })
        })
    }
}

/// Runs `merger` on one input, converting a panic into a failed outcome.
fn process_isolated(
    merger: &PairMerger,
    aligner: &mut OverlapAligner,
    input: &PairInput,
) -> PairOutcome {
    let outcome = isolate(input.id(), || merger.process_input_with(aligner, input));
    match &outcome {
        // The scratch matrix may be half-written; start the next pair from a clean aligner.
        PairOutcome::Failed(PairError::Panicked { .. }) => *aligner = merger.aligner(),
        PairOutcome::Failed(error) => log::debug!("Pair '{}' not merged: {error}", input.id()),
        _ => {}
    }
    outcome
}

/// Runs `process`, reporting a panic as [`PairError::Panicked`].
fn isolate(id: &str, process: impl FnOnce() -> PairOutcome) -> PairOutcome {
    catch_unwind(AssertUnwindSafe(process)).unwrap_or_else(|panic_info| {
        let reason = extract_panic_message(panic_info.as_ref());
        log::warn!("Processing pair '{id}' panicked: {reason}");
        PairOutcome::Failed(PairError::Panicked { reason })
    })
}

fn extract_panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Processes a batch on a pool of `worker_count` threads started for this call.
///
/// # Errors
///
/// Returns an error before any pair is processed if `worker_count` is zero.
///
/// # Examples
///
/// ```
/// use fgmerge_lib::merge::{MergeParams, PairMerger, run_batch};
/// use fgmerge_lib::read_pair::{PairInput, Read, ReadPair};
///
/// let merger = PairMerger::with_posterior_table(MergeParams::default()).unwrap();
/// let inputs = vec![PairInput::from(ReadPair::new(
///     Read::new("p1/1", b"ACGT".to_vec(), vec![30; 4]),
///     Read::new("p1/2", b"ACGT".to_vec(), vec![30; 4]),
/// ))];
/// let outcomes = run_batch(&merger, &inputs, 2).unwrap();
/// assert_eq!(outcomes.len(), 1);
/// assert_eq!(outcomes[0].id, "p1");
///
/// assert!(run_batch(&merger, &inputs, 0).is_err());
/// ```
pub fn run_batch(
    merger: &PairMerger,
    inputs: &[PairInput],
    worker_count: usize,
) -> Result<Vec<TaggedOutcome>> {
    let dispatcher = ParallelDispatcher::new(worker_count)?;
    Ok(dispatcher.run_batch(merger, inputs))
}
