//! Custom error types for seqdedup operations.
//!
//! Every error in this module is terminal for the file being processed: nothing is
//! retried and nothing is skipped. The batch driver decides whether to continue with
//! the remaining inputs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for seqdedup operations
pub type Result<T> = std::result::Result<T, DedupError>;

/// Error type for seqdedup operations
#[derive(Error, Debug)]
pub enum DedupError {
    /// Decoder diagnostics report a premature end of stream
    #[error("Input '{}' appears to be truncated: {diagnostic}", path.display())]
    StreamTruncated {
        /// The input file
        path: PathBuf,
        /// The diagnostic line that triggered the failure
        diagnostic: String,
    },

    /// The input produced no lines at all
    #[error("Input '{}' is empty", path.display())]
    StreamEmpty {
        /// The input file
        path: PathBuf,
    },

    /// A header declares chromosomal-position sort order
    #[error(
        "Input '{}' is position-sorted ({header}); reads must be mate-adjacent, e.g. the \
         unsorted output of the aligner or the result of 'samtools sort -n'",
        path.display()
    )]
    StreamPositionSorted {
        /// The input file
        path: PathBuf,
        /// The offending header line
        header: String,
    },

    /// Two consecutive data lines do not belong to the same fragment
    #[error(
        "Reads are not mate-paired or the file is not correctly ordered: pair {pair_number} of \
         '{}' has read names '{first}' and '{second}'",
        path.display()
    )]
    MatePairMismatch {
        /// The input file
        path: PathBuf,
        /// One-based index of the offending pair
        pair_number: u64,
        /// Read name of the first line of the pair
        first: String,
        /// Read name of the second line of the pair
        second: String,
    },

    /// An odd number of data lines left a read 1 without its read 2
    #[error("Read '{read_name}' in '{}' has no mate: odd number of alignment records", path.display())]
    MalformedPairing {
        /// The input file
        path: PathBuf,
        /// Name of the unpaired read
        read_name: String,
    },

    /// Single-end input was supplied to the paired-end engine
    #[error("Input '{}' is single-end; only paired-end alignments can be deduplicated", path.display())]
    SingleEndInput {
        /// The input file
        path: PathBuf,
    },

    /// A data line could not be parsed as an alignment record
    #[error("Invalid alignment record at line {line_number}: {reason}")]
    InvalidRecord {
        /// One-based line number within the input
        line_number: u64,
        /// Explanation of the problem
        reason: String,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM", "SAM")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Failure to open, read, or write an input, output, or report handle
    #[error("{context}")]
    Io {
        /// What was being attempted
        context: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DedupError {
    /// Wraps an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}
