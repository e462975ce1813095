//! Duplicate-detection keys.
//!
//! Two mate pairs are duplicates when the first [`KEY_PREFIX_LEN`] bases of read 1 and
//! the first [`KEY_PREFIX_LEN`] bases of the reverse complement of read 2 are identical.
//! Mapping position, flags and read names play no part in the key.

use std::fmt;

use crate::dna::reverse_complement_iter;

/// Number of leading bases taken from each read.
pub const KEY_PREFIX_LEN: usize = 50;

/// Separates the two halves of a key; never part of a SAM sequence.
pub const KEY_SEPARATOR: u8 = b':';

/// A duplicate-detection key built from a mate pair's sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(Box<[u8]>);

impl DedupKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Builds the key for a pair of read sequences.
///
/// Read 2 is reverse complemented (narrow A/C/G/T table), then both sides are truncated
/// to [`KEY_PREFIX_LEN`] bases and joined with [`KEY_SEPARATOR`].
///
/// # Examples
///
/// ```
/// use seqdedup_lib::key::build_key;
///
/// let key = build_key(b"ACGTAC", b"AAGG");
/// assert_eq!(key.to_string(), "ACGTAC:CCTT");
/// ```
#[must_use]
pub fn build_key(read1: &[u8], read2: &[u8]) -> DedupKey {
    let mut builder = KeyBuilder::default();
    builder.build(read1, read2).to_owned_key()
}

/// Reusable key buffer for the per-pair hot path.
///
/// Only the last [`KEY_PREFIX_LEN`] bases of read 2 are ever complemented, so the full
/// reverse complement is never materialized.
#[derive(Debug, Default)]
pub struct KeyBuilder {
    buffer: Vec<u8>,
}

impl KeyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::with_capacity(2 * KEY_PREFIX_LEN + 1) }
    }

    /// Builds the key for a pair into the internal buffer and returns a view of it.
    pub fn build(&mut self, read1: &[u8], read2: &[u8]) -> KeyRef<'_> {
        self.buffer.clear();
        self.buffer.extend_from_slice(&read1[..read1.len().min(KEY_PREFIX_LEN)]);
        self.buffer.push(KEY_SEPARATOR);
        self.buffer.extend(reverse_complement_iter(read2).take(KEY_PREFIX_LEN));
        KeyRef(&self.buffer)
    }
}

/// A borrowed key, valid until the next call to [`KeyBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRef<'a>(&'a [u8]);

impl KeyRef<'_> {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0
    }

    #[must_use]
    pub fn to_owned_key(&self) -> DedupKey {
        DedupKey(self.0.into())
    }
}
