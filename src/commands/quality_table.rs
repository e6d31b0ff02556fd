//! Write the merged-base quality table.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use fgmerge_lib::merge::QualityScoreTable;
use fgmerge_lib::phred::MAX_PHRED;
use fgmerge_lib::validation::validate_output_dir;

use crate::commands::command::Command;

/// Write the quality table used to merge overlapping bases.
#[derive(Debug, Parser)]
#[command(
    name = "quality-table",
    about = "\x1b[38;5;166m[UTILITIES]\x1b[0m      \x1b[36mWrite the merged-base quality table as TSV\x1b[0m",
    long_about = r#"
Write the table of merged-base qualities as TSV.

Each row gives the quality of a merged base from the qualities of the two observed bases and
whether they agree:

  qual_a  qual_b  is_match  fused

The table covers every pair of qualities from 0 to --max-quality in both match states. It can
be edited and passed back to `fgmerge merge --quality-table`.

Example usage:
  fgmerge quality-table -o quality_table.tsv
  fgmerge quality-table -o q41.tsv --max-quality 41
"#
)]
pub struct QualityTable {
    /// Output TSV file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Highest quality in the table, and the cap on qualities raised by agreement
    #[arg(short = 'q', long = "max-quality", default_value_t = MAX_PHRED)]
    pub max_quality: u8,
}

impl Command for QualityTable {
    fn execute(&self, _command_line: &str) -> Result<()> {
        validate_output_dir(&self.output, "Output")?;
        let table = QualityScoreTable::try_posterior(self.max_quality)?;
        table.write_tsv(&self.output)?;
        info!(
            "Wrote {} quality table entries (max quality {}) to {}",
            table.entries().count(),
            table.max_quality(),
            self.output.display()
        );
        Ok(())
    }
}
