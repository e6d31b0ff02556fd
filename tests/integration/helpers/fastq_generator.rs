//! Builders for paired FASTQ test inputs.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use fgmerge_lib::dna::reverse_complement;

/// A fragment whose 28-base reads overlap by 16 bases and merge cleanly.
pub const FRAGMENT: &str = "ACGGTCATTGCAGGTACCATGGATCCTTAGGCATGCAACT";

/// Read length used with [`FRAGMENT`].
pub const READ_LEN: usize = 28;

/// One FASTQ record with Phred+33 encoded qualities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub name: String,
    pub seq: String,
    pub qual: String,
}

impl FastqRecord {
    /// A record with every base at the same Phred+33 quality character.
    pub fn new(name: &str, seq: &str, qual_char: char) -> Self {
        let qual = qual_char.to_string().repeat(seq.len());
        Self { name: name.to_string(), seq: seq.to_string(), qual }
    }

    fn to_fastq(&self) -> String {
        format!("@{}\n{}\n+\n{}\n", self.name, self.seq, self.qual)
    }
}

/// Reads from opposite ends of `fragment`; R2 is reverse complemented as a sequencer would.
pub fn overlapping_pair(name: &str, fragment: &str, read_len: usize) -> (FastqRecord, FastqRecord) {
    let r1 = &fragment[..read_len];
    let r2 = reverse_complement(&fragment.as_bytes()[fragment.len() - read_len..]);
    let r2 = String::from_utf8(r2).expect("reverse complement is ASCII");
    (
        FastqRecord::new(&format!("{name}/1"), r1, 'I'),
        FastqRecord::new(&format!("{name}/2"), &r2, 'I'),
    )
}

/// A pair of poly-A reads; R2 reverse complemented is poly-T, so the mates share no bases.
pub fn non_overlapping_pair(name: &str) -> (FastqRecord, FastqRecord) {
    let seq = "A".repeat(READ_LEN);
    (
        FastqRecord::new(&format!("{name}/1"), &seq, '5'),
        FastqRecord::new(&format!("{name}/2"), &seq, '5'),
    )
}

/// Writes records to a FASTQ file.
pub fn write_fastq(path: &Path, records: &[FastqRecord]) {
    let contents: String = records.iter().map(FastqRecord::to_fastq).collect();
    fs::write(path, contents).expect("Failed to write FASTQ");
}

/// Writes the R1 and R2 halves of `pairs` to two FASTQ files.
pub fn write_pairs(r1: &Path, r2: &Path, pairs: &[(FastqRecord, FastqRecord)]) {
    let (first, second): (Vec<_>, Vec<_>) = pairs.iter().cloned().unzip();
    write_fastq(r1, &first);
    write_fastq(r2, &second);
}

/// Reads every record of a FASTQ file.
pub fn read_fastq(path: &Path) -> Vec<FastqRecord> {
    use seq_io::fastq::Record;

    let mut reader = seq_io::fastq::Reader::from_path(path).expect("Failed to open FASTQ");
    let mut records = Vec::new();
    while let Some(result) = reader.next() {
        let record = result.expect("Failed to parse FASTQ");
        records.push(FastqRecord {
            name: record.id().expect("read name is UTF-8").to_string(),
            seq: String::from_utf8(record.seq().to_vec()).expect("bases are ASCII"),
            qual: String::from_utf8(record.qual().to_vec()).expect("qualities are ASCII"),
        });
    }
    records
}
