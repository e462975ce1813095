//! Stream validators run before deduplication.
//!
//! Three checks gate every input, in this order, before any output is opened:
//!
//! 1. **Truncation** - decoder diagnostics must not report a premature end of stream.
//! 2. **Emptiness** - the decoded stream must produce at least one line.
//! 3. **Pair ordering** - the header must not declare position sorting, and the first
//!    [`MAX_ORDERING_PAIRS`] pairs of data lines must be mate-adjacent.
//!
//! Each check opens its own handle on the input and drops it before the next one runs,
//! so the main pass always starts from a fresh handle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::errors::{DedupError, Result};
use crate::io::{RecordSource, decoder_diagnostics};
use crate::layout::{LayoutChoice, ReadLayout, infer_layout};
use crate::record::{header_tag, is_header_line, is_same_fragment, read_name};

/// Maximum number of decoder diagnostic lines examined by the truncation check.
pub const MAX_DIAGNOSTIC_LINES: usize = 10;

/// Maximum number of data-line pairs examined by the ordering check.
pub const MAX_ORDERING_PAIRS: u64 = 100_000;

/// Returns true if a decoder diagnostic reports a truncated stream.
///
/// The line must open with a bracketed severity marker (`[W::...]`, `[E::...]`) and
/// mention either the word `EOF` or the word `truncated`, matched as whole words.
///
/// # Examples
///
/// ```
/// use seqdedup_lib::preflight::is_truncation_diagnostic;
///
/// assert!(is_truncation_diagnostic("[W::bam_hdr_read] EOF marker is absent."));
/// assert!(is_truncation_diagnostic("[E::bgzf_read] file truncated"));
/// assert!(!is_truncation_diagnostic("[W::sam_parse1] unrecognized reference name"));
/// assert!(!is_truncation_diagnostic("EOF marker is absent"));
/// ```
#[must_use]
pub fn is_truncation_diagnostic(line: &str) -> bool {
    has_severity_marker(line)
        && line
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| word == "EOF" || word == "truncated")
}

fn has_severity_marker(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('[') else { return false };
    let Some((marker, _)) = rest.split_once(']') else { return false };
    let Some((severity, function)) = marker.split_once("::") else { return false };
    !severity.is_empty() && !function.is_empty() && severity.chars().all(|c| c.is_ascii_uppercase())
}

/// Returns true if a header line declares chromosomal-position sort order.
///
/// Both a bare `@SO` header and an `@HD` line with `SO:coordinate` count.
#[must_use]
pub fn is_position_sorted_header(line: &str) -> bool {
    match header_tag(line) {
        Some(tag) if tag == *b"SO" => true,
        Some(tag) if tag == *b"HD" => line.split('\t').skip(1).any(|field| field == "SO:coordinate"),
        _ => false,
    }
}

/// Fails with [`DedupError::StreamTruncated`] if the decoder reports a truncated stream.
///
/// # Errors
///
/// Returns an error if the input is truncated or cannot be read.
pub fn check_truncation<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    match first_truncation_diagnostic(decoder_diagnostics(path)?) {
        Some(diagnostic) => Err(DedupError::StreamTruncated { path: path.to_path_buf(), diagnostic }),
        None => Ok(()),
    }
}

/// Returns the first truncation diagnostic among the first [`MAX_DIAGNOSTIC_LINES`] lines.
#[must_use]
pub fn first_truncation_diagnostic<I>(diagnostics: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    diagnostics.into_iter().take(MAX_DIAGNOSTIC_LINES).find(|diagnostic| {
        debug!("Decoder diagnostic: {diagnostic}");
        is_truncation_diagnostic(diagnostic)
    })
}

/// Fails with [`DedupError::StreamEmpty`] if the decoded input has no lines.
///
/// # Errors
///
/// Returns an error if the input is empty or cannot be opened.
pub fn check_not_empty<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let empty = || DedupError::StreamEmpty { path: path.to_path_buf() };

    let len = fs::metadata(path)
        .map_err(|e| DedupError::io(format!("Failed to open input: {}", path.display()), e))?
        .len();
    if len == 0 {
        return Err(empty());
    }

    // A container that ends before its first header or line decodes to nothing.
    let first_line = RecordSource::open(path).and_then(|mut source| source.next_line());
    match first_line {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(empty()),
        Err(e) if is_unexpected_eof(&e) => Err(empty()),
        Err(e) => Err(e),
    }
}

fn is_unexpected_eof(error: &DedupError) -> bool {
    matches!(error, DedupError::Io { source, .. } if source.kind() == io::ErrorKind::UnexpectedEof)
}

/// What the ordering scan saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingScan {
    /// Header lines encountered before the scan stopped
    pub header_lines: Vec<String>,
    /// The first data line, if any
    pub first_data_line: Option<String>,
    /// Number of data-line pairs whose names were compared
    pub pairs_checked: u64,
    /// True if the scan stopped at the pair limit rather than the end of input
    pub limit_reached: bool,
}

/// Scans a line stream for position-sort headers and mis-paired reads.
///
/// Stops without error at the end of the stream or after `max_pairs` pairs. A trailing
/// unpaired data line is not an error here; the pair assembler reports it.
///
/// # Errors
///
/// Returns [`DedupError::StreamPositionSorted`] or [`DedupError::MatePairMismatch`].
pub fn scan_pair_ordering<I>(lines: I, path: &Path, max_pairs: u64) -> Result<OrderingScan>
where
    I: IntoIterator<Item = Result<String>>,
{
    let mut scan = OrderingScan::default();
    let mut pending: Option<String> = None;

    for line in lines {
        let line = line?;
        if is_header_line(&line) {
            if is_position_sorted_header(&line) {
                return Err(DedupError::StreamPositionSorted {
                    path: path.to_path_buf(),
                    header: line,
                });
            }
            scan.header_lines.push(line);
            continue;
        }

        if scan.first_data_line.is_none() {
            scan.first_data_line = Some(line.clone());
        }

        match pending.take() {
            None => pending = Some(line),
            Some(first) => {
                scan.pairs_checked += 1;
                let (first_name, second_name) = (read_name(&first), read_name(&line));
                if !is_same_fragment(first_name, second_name) {
                    return Err(DedupError::MatePairMismatch {
                        path: path.to_path_buf(),
                        pair_number: scan.pairs_checked,
                        first: first_name.to_string(),
                        second: second_name.to_string(),
                    });
                }
                if scan.pairs_checked >= max_pairs {
                    scan.limit_reached = true;
                    break;
                }
            }
        }
    }

    Ok(scan)
}

/// Opens `path` and runs [`scan_pair_ordering`] over its first [`MAX_ORDERING_PAIRS`] pairs.
///
/// # Errors
///
/// Returns an error if the input is position-sorted, mis-paired, or cannot be read.
pub fn check_pair_ordering<P: AsRef<Path>>(path: P) -> Result<OrderingScan> {
    let path = path.as_ref();
    let source = RecordSource::open(path)?;
    scan_pair_ordering(source, path, MAX_ORDERING_PAIRS)
}

/// Outcome of a successful preflight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    pub path: PathBuf,
    pub layout: ReadLayout,
    pub scan: OrderingScan,
}

/// Resolves the layout to hand to the engine, rejecting single-end input.
///
/// # Errors
///
/// Returns [`DedupError::SingleEndInput`] if the layout is, or is inferred to be, single-end.
pub fn resolve_layout(path: &Path, choice: LayoutChoice, scan: &OrderingScan) -> Result<ReadLayout> {
    let layout = match choice.explicit() {
        Some(layout) => layout,
        None => infer_layout(
            scan.header_lines.iter().map(String::as_str),
            scan.first_data_line.as_deref(),
        )
        .unwrap_or_else(|| {
            warn!("Could not infer read layout of {}; assuming paired-end", path.display());
            ReadLayout::PairedEnd
        }),
    };

    match layout {
        ReadLayout::PairedEnd => Ok(layout),
        ReadLayout::SingleEnd => Err(DedupError::SingleEndInput { path: path.to_path_buf() }),
    }
}

/// Runs the truncation, emptiness and ordering checks in order, then resolves the layout.
///
/// # Errors
///
/// Returns the first failing check's error.
pub fn run_preflight<P: AsRef<Path>>(path: P, choice: LayoutChoice) -> Result<PreflightReport> {
    let path = path.as_ref();
    check_truncation(path)?;
    check_not_empty(path)?;
    let scan = check_pair_ordering(path)?;
    let layout = resolve_layout(path, choice, &scan)?;
    debug!(
        "Preflight passed for {}: {} header lines, {} pairs checked",
        path.display(),
        scan.header_lines.len(),
        scan.pairs_checked
    );
    Ok(PreflightReport { path: path.to_path_buf(), layout, scan })
}
