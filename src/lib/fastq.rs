//! Paired FASTQ input and FASTQ output.
//!
//! Input is two uncompressed FASTQ files read in lockstep with `seq_io`; qualities are
//! decoded from Phred+33 as records are read. A file that runs out before its partner leaves
//! the remaining reads unpaired; they are returned as [`PairInput::Orphan`] so the caller
//! can count them.
//!
//! Output is plain FASTQ with Phred+33 qualities.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use seq_io::fastq::Reader as FastqReader;
use seq_io::fastq::Record;

use crate::errors::FgmergeError;
use crate::merge::MergedRecord;
use crate::phred::{decode_phred33, encode_phred33};
use crate::read_pair::{Mate, PairInput, Read, ReadPair};

/// Reads mates from two FASTQ streams in lockstep.
pub struct PairedFastqReader<R: std::io::Read> {
    r1: FastqReader<R>,
    r2: FastqReader<R>,
    r1_label: String,
    r2_label: String,
    records_read: u64,
}

impl PairedFastqReader<File> {
    /// Opens the two FASTQ files.
    pub fn from_paths<P: AsRef<Path>>(r1: P, r2: P) -> Result<Self> {
        let (r1, r2) = (r1.as_ref(), r2.as_ref());
        let r1_file =
            File::open(r1).with_context(|| format!("Failed to open R1 FASTQ: {}", r1.display()))?;
        let r2_file =
            File::open(r2).with_context(|| format!("Failed to open R2 FASTQ: {}", r2.display()))?;
        Ok(Self::new(r1_file, r2_file, r1.display().to_string(), r2.display().to_string()))
    }
}

impl<R: std::io::Read> PairedFastqReader<R> {
    /// Wraps two readers; the labels name the sources in error messages.
    pub fn new(r1: R, r2: R, r1_label: impl Into<String>, r2_label: impl Into<String>) -> Self {
        Self {
            r1: FastqReader::new(r1),
            r2: FastqReader::new(r2),
            r1_label: r1_label.into(),
            r2_label: r2_label.into(),
            records_read: 0,
        }
    }

    /// Total number of FASTQ records read from both inputs so far.
    #[must_use]
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Reads up to `batch_size` inputs; an empty batch means both files are exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be parsed.
    pub fn next_batch(&mut self, batch_size: usize) -> Result<Vec<PairInput>> {
        let mut batch = Vec::with_capacity(batch_size);
        while batch.len() < batch_size {
            let r1 = next_read(&mut self.r1, &self.r1_label)?;
            let r2 = next_read(&mut self.r2, &self.r2_label)?;
            self.records_read += u64::from(r1.is_some()) + u64::from(r2.is_some());
            let input = match (r1, r2) {
                (Some(r1), Some(r2)) => PairInput::Paired(ReadPair::new(r1, r2)),
                (Some(read), None) => PairInput::Orphan { read, mate: Mate::R1 },
                (None, Some(read)) => PairInput::Orphan { read, mate: Mate::R2 },
                (None, None) => break,
            };
            batch.push(input);
        }
        Ok(batch)
    }
}

/// Reads one record, decoding its qualities.
fn next_read<R: std::io::Read>(reader: &mut FastqReader<R>, label: &str) -> Result<Option<Read>> {
    let Some(result) = reader.next() else {
        return Ok(None);
    };
    let record = result.with_context(|| format!("Failed to parse FASTQ record from {label}"))?;
    let name = record
        .id()
        .map_err(|e| anyhow!("Read name in {label} is not valid UTF-8: {e}"))?
        .to_string();
    let quals = decode_phred33(record.qual()).map_err(|byte| FgmergeError::InvalidFileFormat {
        file_type: "FASTQ".to_string(),
        path: label.to_string(),
        reason: format!("read '{name}' has invalid quality character 0x{byte:02x}"),
    })?;
    Ok(Some(Read::new(name, record.seq().to_vec(), quals)))
}

/// Writes FASTQ records with Phred+33 qualities.
pub struct FastqWriter<W: Write> {
    inner: W,
    records_written: u64,
}

impl FastqWriter<BufWriter<File>> {
    /// Creates (or truncates) a FASTQ file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> FastqWriter<W> {
    /// Wraps an existing writer.
    pub fn new(inner: W) -> Self {
        Self { inner, records_written: 0 }
    }

    /// Number of records written.
    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Writes one record; `quals` are numeric and are encoded as Phred+33.
    pub fn write_record(&mut self, name: &str, bases: &[u8], quals: &[u8]) -> Result<()> {
        self.inner.write_all(b"@")?;
        self.inner.write_all(name.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.inner.write_all(bases)?;
        self.inner.write_all(b"\n+\n")?;
        self.inner.write_all(&encode_phred33(quals))?;
        self.inner.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    /// Writes a merged read under its pair identifier.
    pub fn write_merged(&mut self, record: &MergedRecord) -> Result<()> {
        self.write_record(&record.id, &record.bases, &record.quals)
    }

    /// Writes an input read unchanged.
    pub fn write_read(&mut self, read: &Read) -> Result<()> {
        self.write_record(&read.name, &read.bases, &read.quals)
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush().context("Failed to flush FASTQ output")?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn reader(r1: &str, r2: &str) -> PairedFastqReader<Cursor<Vec<u8>>> {
        PairedFastqReader::new(
            Cursor::new(r1.as_bytes().to_vec()),
            Cursor::new(r2.as_bytes().to_vec()),
            "r1.fq",
            "r2.fq",
        )
    }

    #[test]
    fn test_reads_pairs_in_batches() -> Result<()> {
        let r1 = "@a/1 comment\nACGT\n+\nIIII\n@b/1\nGGCC\n+\n!!!!\n@c/1\nTT\n+\n55\n";
        let r2 = "@a/2\nTTTT\n+\n++++\n@b/2\nAAAA\n+\nIIII\n@c/2\nCC\n+\n55\n";
        let mut reader = reader(r1, r2);

        let first = reader.next_batch(2)?;
        assert_eq!(first.len(), 2);
        match &first[0] {
            PairInput::Paired(pair) => {
                assert_eq!(pair.r1.name, "a/1");
                assert_eq!(pair.r1.quals, vec![40; 4]);
                assert_eq!(pair.r2.quals, vec![10; 4]);
                assert_eq!(pair.id(), "a");
            }
            other => panic!("expected a pair, got {other:?}"),
        }

        let second = reader.next_batch(2)?;
        assert_eq!(second.len(), 1);
        assert!(reader.next_batch(2)?.is_empty());
        assert_eq!(reader.records_read(), 6);
        Ok(())
    }

    #[test]
    fn test_unequal_files_produce_orphans() -> Result<()> {
        let r1 = "@a/1\nACGT\n+\nIIII\n@b/1\nGGCC\n+\nIIII\n";
        let r2 = "@a/2\nTTTT\n+\nIIII\n";
        let batch = reader(r1, r2).next_batch(10)?;
        assert_eq!(batch.len(), 2);
        match &batch[1] {
            PairInput::Orphan { read, mate } => {
                assert_eq!(read.name, "b/1");
                assert_eq!(*mate, Mate::R1);
            }
            other => panic!("expected an orphan, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_quality_character() {
        let r1 = "@a/1\nACGT\n+\nII I\n";
        let r2 = "@a/2\nTTTT\n+\nIIII\n";
        let err = reader(r1, r2).next_batch(1).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("invalid quality character 0x20"), "{msg}");
        assert!(msg.contains("r1.fq"));
    }

    #[test]
    fn test_malformed_fastq_is_an_error() {
        let r1 = "not a fastq file\n";
        let r2 = "@a/2\nTTTT\n+\nIIII\n";
        assert!(reader(r1, r2).next_batch(1).is_err());
    }

    #[test]
    fn test_missing_input_file() {
        let err = PairedFastqReader::from_paths("/nonexistent/r1.fq", "/nonexistent/r2.fq")
            .err()
            .expect("opening a missing file should fail");
        assert!(err.to_string().contains("Failed to open R1 FASTQ"));
    }

    #[test]
    fn test_writer_encodes_qualities() -> Result<()> {
        let mut writer = FastqWriter::new(Vec::new());
        writer.write_record("m1", b"ACGT", &[0, 10, 40, 93])?;
        assert_eq!(writer.records_written(), 1);
        let bytes = writer.finish()?;
        assert_eq!(String::from_utf8(bytes)?, "@m1\nACGT\n+\n!+I~\n");
        Ok(())
    }

    #[test]
    fn test_written_reads_can_be_read_back() -> Result<()> {
        let dir = TempDir::new()?;
        let (p1, p2) = (dir.path().join("r1.fq"), dir.path().join("r2.fq"));
        let r1 = Read::new("x/1", b"ACGTN".to_vec(), vec![2, 20, 30, 40, 41]);
        let r2 = Read::new("x/2", b"GGTTA".to_vec(), vec![37; 5]);

        let mut w1 = FastqWriter::create(&p1)?;
        w1.write_read(&r1)?;
        w1.finish()?;
        let mut w2 = FastqWriter::create(&p2)?;
        w2.write_read(&r2)?;
        w2.finish()?;

        let batch = PairedFastqReader::from_paths(&p1, &p2)?.next_batch(5)?;
        assert_eq!(batch, vec![PairInput::Paired(ReadPair::new(r1, r2))]);
        Ok(())
    }
}
