//! DNA sequence utilities.
//!
//! The complement table here is deliberately narrow: only `A`, `C`, `G` and `T` are
//! substituted. Lowercase bases, `N` and IUPAC ambiguity codes pass through unchanged so
//! that dedup keys only ever equate sequences that were byte-identical upstream.

/// Complements a single DNA base.
///
/// Returns the Watson-Crick complement for uppercase `A`, `C`, `G`, `T`; every other
/// byte is returned unchanged.
#[inline]
#[must_use]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _ => base,
    }
}

/// Iterates over the reverse complement of `seq` without allocating.
#[inline]
pub fn reverse_complement_iter(seq: &[u8]) -> impl Iterator<Item = u8> + '_ {
    seq.iter().rev().map(|&base| complement_base(base))
}

/// Reverse complements a DNA sequence.
///
/// # Examples
///
/// ```
/// use seqdedup_lib::dna::reverse_complement;
///
/// assert_eq!(reverse_complement(b"AAGG"), b"CCTT".to_vec());
/// assert_eq!(reverse_complement(b"ACGTN"), b"NACGT".to_vec());
/// assert_eq!(reverse_complement(b"acgt"), b"tgca".to_vec());  // case is not folded
/// ```
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    reverse_complement_iter(seq).collect()
}
