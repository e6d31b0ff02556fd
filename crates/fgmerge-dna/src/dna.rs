//! Nucleotide complement and ambiguity handling.
//!
//! Complementation is a single byte-wise table lookup covering the whole IUPAC alphabet,
//! so ambiguity codes survive reverse complementation (`R`<->`Y`, `K`<->`M`, `B`<->`V`,
//! `D`<->`H`; `S`, `W` and `N` are self-complementary). Case is preserved and bytes outside
//! the alphabet are returned unchanged, which makes [`complement_base`] an involution over
//! all 256 byte values.

/// Lookup table for base complement over the IUPAC alphabet (case preserving).
static COMPLEMENT: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    let pairs: [(u8, u8); 6] =
        [(b'A', b'T'), (b'C', b'G'), (b'R', b'Y'), (b'K', b'M'), (b'B', b'V'), (b'D', b'H')];
    let mut p = 0;
    while p < pairs.len() {
        let (x, y) = pairs[p];
        table[x as usize] = y;
        table[y as usize] = x;
        table[x.to_ascii_lowercase() as usize] = y.to_ascii_lowercase();
        table[y.to_ascii_lowercase() as usize] = x.to_ascii_lowercase();
        p += 1;
    }
    table
};

/// Complements a single base, preserving case.
///
/// # Examples
///
/// ```
/// use fgmerge_dna::complement_base;
///
/// assert_eq!(complement_base(b'A'), b'T');
/// assert_eq!(complement_base(b'r'), b'y');
/// assert_eq!(complement_base(b'N'), b'N');
/// ```
#[inline]
#[must_use]
pub fn complement_base(base: u8) -> u8 {
    COMPLEMENT[base as usize]
}

/// Reverse complements a DNA sequence.
///
/// # Examples
///
/// ```
/// use fgmerge_dna::reverse_complement;
///
/// assert_eq!(reverse_complement(b"AACGTN"), b"NACGTT".to_vec());
/// assert_eq!(reverse_complement(b"ARKB"), b"VMYT".to_vec());
/// ```
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| complement_base(base)).collect()
}

/// Returns true if `base` is anything other than a concrete `A`, `C`, `G` or `T`.
///
/// IUPAC ambiguity codes, `N` and any other symbol are all treated as ambiguous.
#[inline]
#[must_use]
pub const fn is_ambiguous(base: u8) -> bool {
    !matches!(base, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't')
}

/// Returns true if two aligned bases count as a match.
///
/// Concrete bases match case-insensitively; an ambiguous base on either side is a
/// wildcard and matches anything.
///
/// # Examples
///
/// ```
/// use fgmerge_dna::bases_compatible;
///
/// assert!(bases_compatible(b'A', b'a'));
/// assert!(!bases_compatible(b'A', b'C'));
/// assert!(bases_compatible(b'N', b'C'));
/// assert!(bases_compatible(b'R', b'T'));
/// ```
#[inline]
#[must_use]
pub const fn bases_compatible(a: u8, b: u8) -> bool {
    is_ambiguous(a) || is_ambiguous(b) || a.eq_ignore_ascii_case(&b)
}
