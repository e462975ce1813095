//! Textual alignment records.
//!
//! Lines of the alignment stream are either header lines (`@` followed by a two-letter
//! tag and a tab) or tab-delimited data lines. Data lines are viewed through
//! [`AlignmentRecord`] without copying; the raw line is what gets written back out.

use noodles::sam::alignment::record::Flags;

use crate::errors::{DedupError, Result};

/// Minimum number of tab-delimited fields in a SAM data line.
pub const MIN_FIELDS: usize = 11;

/// Mate suffixes stripped from read names before comparing mates.
const MATE_SUFFIXES: [&str; 2] = ["/1", "/2"];

/// Returns the two-letter tag if `line` is a header line.
///
/// # Examples
///
/// ```
/// use seqdedup_lib::record::header_tag;
///
/// assert_eq!(header_tag("@HD\tVN:1.6"), Some(*b"HD"));
/// assert_eq!(header_tag("@CO"), Some(*b"CO"));
/// assert_eq!(header_tag("read1\t99\tchr1"), None);
/// ```
#[must_use]
pub fn header_tag(line: &str) -> Option<[u8; 2]> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'@' {
        return None;
    }
    if !bytes[1].is_ascii_alphabetic() || !bytes[2].is_ascii_alphanumeric() {
        return None;
    }
    if bytes.len() > 3 && bytes[3] != b'\t' {
        return None;
    }
    Some([bytes[1], bytes[2]])
}

/// Returns true if `line` is a header line.
#[inline]
#[must_use]
pub fn is_header_line(line: &str) -> bool {
    header_tag(line).is_some()
}

/// Returns the read name (first field) of a data line.
#[inline]
#[must_use]
pub fn read_name(line: &str) -> &str {
    line.split_once('\t').map_or(line, |(name, _)| name)
}

/// Strips a single trailing `/1` or `/2` mate suffix from a read name.
///
/// # Examples
///
/// ```
/// use seqdedup_lib::record::strip_mate_suffix;
///
/// assert_eq!(strip_mate_suffix("readA/1"), "readA");
/// assert_eq!(strip_mate_suffix("readA/2"), "readA");
/// assert_eq!(strip_mate_suffix("readA/3"), "readA/3");
/// assert_eq!(strip_mate_suffix("readA"), "readA");
/// ```
#[must_use]
pub fn strip_mate_suffix(name: &str) -> &str {
    MATE_SUFFIXES.iter().find_map(|suffix| name.strip_suffix(suffix)).unwrap_or(name)
}

/// Returns true if two read names refer to the same fragment once mate suffixes are removed.
#[inline]
#[must_use]
pub fn is_same_fragment(first: &str, second: &str) -> bool {
    strip_mate_suffix(first) == strip_mate_suffix(second)
}

/// A borrowed view of one SAM data line.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentRecord<'a> {
    line: &'a str,
    name: &'a str,
    flags: Flags,
    reference_name: &'a str,
    position: u64,
    cigar: &'a str,
    sequence: &'a str,
}

impl<'a> AlignmentRecord<'a> {
    /// Parses the fields needed for deduplication out of a data line.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidRecord`] if the line has fewer than eleven fields or
    /// if the flag or position fields are not integers.
    pub fn parse(line: &'a str, line_number: u64) -> Result<Self> {
        let fields: Vec<&str> = line.splitn(MIN_FIELDS + 1, '\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(DedupError::InvalidRecord {
                line_number,
                reason: format!("expected at least {MIN_FIELDS} fields, found {}", fields.len()),
            });
        }

        let flags = fields[1].parse::<u16>().map(Flags::from).map_err(|_| {
            DedupError::InvalidRecord {
                line_number,
                reason: format!("flag '{}' is not an integer", fields[1]),
            }
        })?;

        let position = fields[3].parse::<u64>().map_err(|_| DedupError::InvalidRecord {
            line_number,
            reason: format!("position '{}' is not an integer", fields[3]),
        })?;

        Ok(Self {
            line,
            name: fields[0],
            flags,
            reference_name: fields[2],
            position,
            cigar: fields[5],
            sequence: fields[9],
        })
    }

    /// The raw line this record was parsed from.
    #[must_use]
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// The read name, including any mate suffix.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[must_use]
    pub fn reference_name(&self) -> &'a str {
        self.reference_name
    }

    /// One-based leftmost position, `0` when unmapped.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    #[must_use]
    pub fn cigar(&self) -> &'a str {
        self.cigar
    }

    /// The read bases as emitted by the aligner.
    #[must_use]
    pub fn sequence(&self) -> &'a [u8] {
        self.sequence.as_bytes()
    }
}
