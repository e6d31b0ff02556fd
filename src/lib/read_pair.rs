//! In-memory reads and read pairs.
//!
//! Qualities are numeric Phred scores (already decoded from Phred+33). Reads are produced by
//! [`crate::fastq`] and are never modified once built; the processor borrows them.

/// A single sequencing read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    /// Read name, without the leading `@` and without any header comment
    pub name: String,
    /// Bases as ASCII (IUPAC alphabet, any case)
    pub bases: Vec<u8>,
    /// Numeric Phred quality per base
    pub quals: Vec<u8>,
}

impl Read {
    /// Creates a new read.
    #[must_use]
    pub fn new(name: impl Into<String>, bases: Vec<u8>, quals: Vec<u8>) -> Self {
        Self { name: name.into(), bases, quals }
    }

    /// Number of bases in the read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Returns true if the read has no bases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Name with any trailing `/1` or `/2` mate suffix removed.
    #[must_use]
    pub fn fragment_name(&self) -> &str {
        normalize_read_name(&self.name)
    }
}

/// Strips a header comment and a trailing `/1` or `/2` mate suffix from a read name.
///
/// # Examples
/// ```
/// use fgmerge_lib::read_pair::normalize_read_name;
///
/// assert_eq!(normalize_read_name("frag1/1"), "frag1");
/// assert_eq!(normalize_read_name("frag1/2"), "frag1");
/// assert_eq!(normalize_read_name("frag1 1:N:0:ACGT"), "frag1");
/// assert_eq!(normalize_read_name("frag1/3"), "frag1/3");
/// ```
#[must_use]
pub fn normalize_read_name(name: &str) -> &str {
    let name = name.split_ascii_whitespace().next().unwrap_or("");
    name.strip_suffix("/1").or_else(|| name.strip_suffix("/2")).unwrap_or(name)
}

/// Two mates sequenced from the same fragment.
///
/// `r2` is stored as sequenced; the processor reverse complements it when configured to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPair {
    /// First mate (forward strand)
    pub r1: Read,
    /// Second mate (as sequenced)
    pub r2: Read,
}

impl ReadPair {
    /// Creates a new pair.
    #[must_use]
    pub fn new(r1: Read, r2: Read) -> Self {
        Self { r1, r2 }
    }

    /// Identifier of the pair, taken from the first mate.
    #[must_use]
    pub fn id(&self) -> &str {
        self.r1.fragment_name()
    }

    /// Checks that the mates belong together and that each read is internally consistent.
    ///
    /// Returns a description of the first problem found.
    pub fn check_mates(&self) -> std::result::Result<(), String> {
        for (label, read) in [("R1", &self.r1), ("R2", &self.r2)] {
            if read.bases.len() != read.quals.len() {
                return Err(format!(
                    "{label} '{}' has {} bases but {} qualities",
                    read.name,
                    read.bases.len(),
                    read.quals.len()
                ));
            }
        }
        if self.r1.fragment_name() != self.r2.fragment_name() {
            return Err(format!(
                "mate names differ: R1 '{}' vs R2 '{}'",
                self.r1.name, self.r2.name
            ));
        }
        Ok(())
    }
}

/// Which mate of a pair a read is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mate {
    /// First mate
    R1,
    /// Second mate
    R2,
}

impl std::fmt::Display for Mate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mate::R1 => write!(f, "R1"),
            Mate::R2 => write!(f, "R2"),
        }
    }
}

/// One unit of work for the merger.
///
/// Input files that run out of records at different points leave reads without a mate;
/// those are carried through as [`PairInput::Orphan`] so they are classified rather than
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairInput {
    /// A complete pair
    Paired(ReadPair),
    /// A read whose mate was missing
    Orphan {
        /// The read that was present
        read: Read,
        /// Which mate the present read is
        mate: Mate,
    },
}

impl PairInput {
    /// Identifier used to tag the outcome of this input.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            PairInput::Paired(pair) => pair.id(),
            PairInput::Orphan { read, .. } => read.fragment_name(),
        }
    }
}

impl From<ReadPair> for PairInput {
    fn from(pair: ReadPair) -> Self {
        PairInput::Paired(pair)
    }
}
