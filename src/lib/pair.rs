//! Mate-pair assembly.
//!
//! Data lines arrive mate-adjacent: read 1 immediately followed by its read 2. The
//! assembler groups them two at a time and passes header lines through untouched.
//! Read names are not re-checked here; the preflight ordering scan covers that.

use std::path::{Path, PathBuf};

use crate::errors::{DedupError, Result};
use crate::record::{AlignmentRecord, is_header_line, read_name};

/// Two consecutive data lines taken to be read 1 and read 2 of one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatePair {
    first: String,
    second: String,
    first_line_number: u64,
}

impl MatePair {
    /// Creates a pair from two raw data lines; `first_line_number` is the one-based
    /// line number of `first` in the input.
    #[must_use]
    pub fn new(first: String, second: String, first_line_number: u64) -> Self {
        Self { first, second, first_line_number }
    }

    /// The raw read 1 line.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The raw read 2 line.
    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Parses both lines into record views.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidRecord`] if either line is not a valid data line.
    pub fn records(&self) -> Result<(AlignmentRecord<'_>, AlignmentRecord<'_>)> {
        Ok((
            AlignmentRecord::parse(&self.first, self.first_line_number)?,
            AlignmentRecord::parse(&self.second, self.first_line_number + 1)?,
        ))
    }
}

/// One item of the assembled stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem {
    /// A header line to forward verbatim
    Header(String),
    /// A mate pair to deduplicate
    Pair(MatePair),
}

/// Groups a line stream into header lines and mate pairs.
pub struct PairAssembler<I> {
    lines: I,
    path: PathBuf,
    line_number: u64,
}

impl<I> PairAssembler<I>
where
    I: Iterator<Item = Result<String>>,
{
    /// `path` is only used to name the input in error messages.
    pub fn new<P: AsRef<Path>>(lines: I, path: P) -> Self {
        Self { lines, path: path.as_ref().to_path_buf(), line_number: 0 }
    }

    fn next_line(&mut self) -> Option<Result<String>> {
        let line = self.lines.next();
        if matches!(line, Some(Ok(_))) {
            self.line_number += 1;
        }
        line
    }

    /// Returns the next header line or mate pair, or `None` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::MalformedPairing`] if the stream ends between read 1 and
    /// read 2, or if a header line appears where read 2 was expected.
    pub fn next_item(&mut self) -> Result<Option<StreamItem>> {
        let first = match self.next_line().transpose()? {
            None => return Ok(None),
            Some(line) if is_header_line(&line) => return Ok(Some(StreamItem::Header(line))),
            Some(line) => line,
        };
        let first_line_number = self.line_number;

        match self.next_line().transpose()? {
            Some(second) if !is_header_line(&second) => {
                Ok(Some(StreamItem::Pair(MatePair::new(first, second, first_line_number))))
            }
            _ => Err(DedupError::MalformedPairing {
                path: self.path.clone(),
                read_name: read_name(&first).to_string(),
            }),
        }
    }
}

impl<I> Iterator for PairAssembler<I>
where
    I: Iterator<Item = Result<String>>,
{
    type Item = Result<StreamItem>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}
