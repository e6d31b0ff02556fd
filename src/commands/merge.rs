//! Merge overlapping read pairs into single reads.
//!
//! Reads two FASTQ files in lockstep, merges each pair whose mates overlap well enough, and
//! writes the merged reads in input order. Pairs that are not merged can be written unchanged
//! to a second pair of FASTQ files.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use log::info;

use fgmerge_lib::fastq::{FastqWriter, PairedFastqReader};
use fgmerge_lib::logging::{OperationTimer, format_percent, log_merge_summary};
use fgmerge_lib::merge::{
    PairMerger, PairOutcome, ParallelDispatcher, QualityScoreTable, RejectionTally, TaggedOutcome,
};
use fgmerge_lib::metrics::{MergeMetrics, write_metrics_auto};
use fgmerge_lib::phred::MAX_PHRED;
use fgmerge_lib::progress::ProgressTracker;
use fgmerge_lib::read_pair::PairInput;
use fgmerge_lib::validation::{
    validate_both_or_neither, validate_distinct_paths, validate_file_exists, validate_output_dir,
    validate_positive,
};

use crate::commands::command::Command;
use crate::commands::common::{MergeOptions, MetricsOptions, PairedInputOptions, ThreadingOptions};

/// Default number of pairs handed to the worker pool at a time.
const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Merge overlapping read pairs.
#[derive(Debug, Parser)]
#[command(
    name = "merge",
    about = "\x1b[38;5;72m[MERGING]\x1b[0m        \x1b[36mMerge overlapping read pairs into single reads\x1b[0m",
    long_about = r#"
Merge overlapping paired-end reads into single reads.

The first and second reads of each pair are read in lockstep from --r1 and --r2. R2 is
reverse complemented (unless --no-reverse-complement) and aligned against R1 without
penalising unaligned read ends. A pair is merged when the overlap is at least
--min-alignment-length columns long and at least --min-similarity of its columns match.

Within the overlap each column becomes one base. Where the mates agree the quality rises;
where they disagree the higher-quality base is kept with a reduced quality. Qualities come
from a posterior model capped at --max-quality, or from a table written by
`fgmerge quality-table` and given with --quality-table.

Merged reads are written to --output in input order, named by the pair's read name without
its /1 or /2 suffix. Pairs that are not merged are written unchanged to --unmerged-r1 and
--unmerged-r2 when both are given.

Example usage:
  fgmerge merge --r1 sample_R1.fq --r2 sample_R2.fq -o merged.fq
  fgmerge merge -1 r1.fq -2 r2.fq -o merged.fq --unmerged-r1 un1.fq --unmerged-r2 un2.fq \
      --metrics merge_metrics.txt --threads 8
"#
)]
pub struct Merge {
    /// Paired FASTQ inputs
    #[command(flatten)]
    pub input: PairedInputOptions,

    /// Output FASTQ for merged reads
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Optional output FASTQ for the first read of pairs that were not merged
    #[arg(long = "unmerged-r1")]
    pub unmerged_r1: Option<PathBuf>,

    /// Optional output FASTQ for the second read of pairs that were not merged
    #[arg(long = "unmerged-r2")]
    pub unmerged_r2: Option<PathBuf>,

    /// Alignment scores and acceptance thresholds
    #[command(flatten)]
    pub merge: MergeOptions,

    /// Highest quality agreement can raise a merged base to [default: 93]
    #[arg(short = 'q', long = "max-quality", conflicts_with = "quality_table")]
    pub max_quality: Option<u8>,

    /// Quality table TSV to use instead of the posterior model
    #[arg(long = "quality-table")]
    pub quality_table: Option<PathBuf>,

    /// Number of pairs read and merged per batch
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Worker pool options
    #[command(flatten)]
    pub threading: ThreadingOptions,

    /// Metrics output options
    #[command(flatten)]
    pub metrics: MetricsOptions,
}

/// Writers for the two reads of pairs that were not merged.
struct UnmergedWriters {
    r1: FastqWriter<BufWriter<File>>,
    r2: FastqWriter<BufWriter<File>>,
}

impl Merge {
    fn validate(&self) -> Result<()> {
        self.input.validate()?;
        validate_positive(self.batch_size, "batch-size")?;
        validate_both_or_neither(
            self.unmerged_r1.as_ref(),
            self.unmerged_r2.as_ref(),
            "unmerged-r1",
            "unmerged-r2",
        )?;
        if let Some(table) = &self.quality_table {
            validate_file_exists(table, "Quality table")?;
        }

        let mut paths = vec![
            (&self.input.r1, "r1"),
            (&self.input.r2, "r2"),
            (&self.output, "output"),
        ];
        paths.extend(self.unmerged_r1.iter().map(|p| (p, "unmerged-r1")));
        paths.extend(self.unmerged_r2.iter().map(|p| (p, "unmerged-r2")));
        paths.extend(self.metrics.metrics.iter().map(|p| (p, "metrics")));
        validate_distinct_paths(&paths)?;
        for (path, desc) in &paths[2..] {
            validate_output_dir(path, desc)?;
        }
        Ok(())
    }

    fn load_table(&self) -> Result<QualityScoreTable> {
        match &self.quality_table {
            Some(path) => {
                let table = QualityScoreTable::from_tsv(path)?;
                info!(
                    "Loaded quality table from {} (max quality {})",
                    path.display(),
                    table.max_quality()
                );
                Ok(table)
            }
            None => Ok(QualityScoreTable::try_posterior(self.max_quality.unwrap_or(MAX_PHRED))?),
        }
    }

    fn open_unmerged(&self) -> Result<Option<UnmergedWriters>> {
        match (&self.unmerged_r1, &self.unmerged_r2) {
            (Some(r1), Some(r2)) => Ok(Some(UnmergedWriters {
                r1: FastqWriter::create(r1)?,
                r2: FastqWriter::create(r2)?,
            })),
            _ => Ok(None),
        }
    }
}

impl Command for Merge {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.validate()?;

        let table = self.load_table()?;
        let params = self.merge.to_params(self.threading.threads, table.max_quality());
        params.validate()?;

        info!("Starting Merge");
        info!("Command line: {command_line}");
        info!("R1: {}", self.input.r1.display());
        info!("R2: {}", self.input.r2.display());
        info!("Output: {}", self.output.display());
        info!(
            "Scoring: match {}, mismatch {}, gap {}",
            params.scoring.match_score, params.scoring.mismatch_score, params.scoring.gap_penalty
        );
        info!(
            "Minimum similarity: {}, minimum alignment length: {}",
            format_percent(params.min_similarity, 1),
            params.min_alignment_length
        );
        if !params.reverse_complement_second_read {
            info!("R2 will be aligned without reverse complementing");
        }

        let merger = PairMerger::new(params, Arc::new(table))?;
        let dispatcher = ParallelDispatcher::new(self.threading.threads)?;
        info!(
            "Using {} worker thread(s), batches of {} pairs",
            dispatcher.worker_count(),
            self.batch_size
        );

        let mut reader = PairedFastqReader::from_paths(&self.input.r1, &self.input.r2)?;
        let mut writer = FastqWriter::create(&self.output)?;
        let mut unmerged = self.open_unmerged()?;

        let timer = OperationTimer::new("Merging read pairs");
        let progress = ProgressTracker::new("Processed", "pairs");
        let mut tally = RejectionTally::new();

        loop {
            let batch = reader.next_batch(self.batch_size)?;
            if batch.is_empty() {
                break;
            }
            let mut outcomes = dispatcher.run_batch(&merger, &batch);
            outcomes.sort_unstable_by_key(|tagged| tagged.index);
            tally.merge(&dispatcher.tally(&outcomes));
            write_outcomes(&batch, &outcomes, &mut writer, unmerged.as_mut())?;
            progress.add(batch.len() as u64);
        }
        progress.log_final();

        let merged_written = writer.records_written();
        writer.finish()?;
        if let Some(UnmergedWriters { r1, r2 }) = unmerged {
            r1.finish()?;
            r2.finish()?;
        }
        if merged_written != tally.merged {
            bail!("Wrote {merged_written} merged reads but merged {} pairs", tally.merged);
        }

        let metrics = tally.to_metrics();
        if let Some(path) = &self.metrics.metrics {
            write_metrics_auto(path, &[metrics.clone()])?;
            info!("Wrote metrics to {}", path.display());
        }
        log_merge_summary(&metrics);
        timer.log_completion(metrics.total_pairs, "pairs");
        warn_if_nothing_merged(&metrics);
        Ok(())
    }
}

/// Writes one batch's outcomes; `outcomes` must be in submission order.
fn write_outcomes(
    batch: &[PairInput],
    outcomes: &[TaggedOutcome],
    writer: &mut FastqWriter<BufWriter<File>>,
    mut unmerged: Option<&mut UnmergedWriters>,
) -> Result<()> {
    for tagged in outcomes {
        match (&tagged.outcome, &batch[tagged.index]) {
            (PairOutcome::Merged(record), _) => writer.write_merged(record)?,
            (_, PairInput::Paired(pair)) => {
                if let Some(out) = unmerged.as_deref_mut() {
                    out.r1.write_read(&pair.r1)?;
                    out.r2.write_read(&pair.r2)?;
                }
            }
            // A read without a mate has no place in paired outputs
            (_, PairInput::Orphan { .. }) => {}
        }
    }
    Ok(())
}

fn warn_if_nothing_merged(metrics: &MergeMetrics) {
    if metrics.total_pairs > 0 && metrics.merged_pairs == 0 {
        log::warn!(
            "No pairs were merged; check that the reads overlap and that \
             --r1/--r2 are in the same order"
        );
    }
}
