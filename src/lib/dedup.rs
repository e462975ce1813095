//! Sequence-based duplicate removal.
//!
//! A [`DedupContext`] holds everything that lives for the processing of one input: the
//! set of keys seen so far, the counters, and a reusable key buffer. Nothing in it is
//! shared between files, so inputs can be processed independently (and, later, in
//! parallel) without changing results.
//!
//! # Algorithm
//!
//! 1. Build the key from read 1's sequence and read 2's sequence (see [`crate::key`])
//! 2. If the key was seen before, count the pair as removed and drop it
//! 3. Otherwise remember the key and emit both lines unmodified
//!
//! Output is a strict subsequence of the input: first occurrence wins and nothing is
//! reordered or buffered beyond the current pair.
//!
//! # Memory
//!
//! The seen-key set grows with the number of distinct keys in a file, at most about
//! 100 bytes per unique pair plus hashing overhead. Very large inputs with few duplicates
//! need memory proportional to their pair count.

use std::path::Path;

use ahash::AHashSet;
use log::trace;

use crate::errors::{DedupError, Result};
use crate::io::{AlignmentFormat, RecordSink, RecordSource};
use crate::key::KeyBuilder;
use crate::layout::ReadLayout;
use crate::pair::{MatePair, PairAssembler, StreamItem};
use crate::progress::ProgressTracker;

/// Keys of the mate pairs already emitted for one input.
#[derive(Debug, Default)]
pub struct SeenKeySet {
    keys: AHashSet<Box<[u8]>>,
}

impl SeenKeySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key`, returning true if it was not present before.
    pub fn insert(&mut self, key: &[u8]) -> bool {
        if self.keys.contains(key) {
            false
        } else {
            self.keys.insert(key.into());
            true
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Pair counts for one input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunCounters {
    /// Mate pairs examined
    pub total: u64,
    /// Mate pairs dropped as duplicates
    pub removed: u64,
}

impl RunCounters {
    /// Mate pairs written to the output.
    #[must_use]
    pub fn retained(&self) -> u64 {
        self.total - self.removed
    }

    /// Percentage of pairs removed, or `None` when no pairs were examined.
    #[must_use]
    pub fn removed_pct(&self) -> Option<f64> {
        self.percent_of_total(self.removed)
    }

    /// Percentage of pairs retained, or `None` when no pairs were examined.
    #[must_use]
    pub fn retained_pct(&self) -> Option<f64> {
        self.percent_of_total(self.retained())
    }

    #[allow(clippy::cast_precision_loss)]
    fn percent_of_total(&self, count: u64) -> Option<f64> {
        (self.total > 0).then(|| count as f64 / self.total as f64 * 100.0)
    }
}

/// What to do with a mate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// First occurrence: write both lines
    Emit,
    /// Duplicate: write nothing
    Drop,
}

/// Per-file deduplication state.
#[derive(Debug)]
pub struct DedupContext {
    seen: SeenKeySet,
    counters: RunCounters,
    key_builder: KeyBuilder,
}

impl Default for DedupContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupContext {
    #[must_use]
    pub fn new() -> Self {
        Self { seen: SeenKeySet::new(), counters: RunCounters::default(), key_builder: KeyBuilder::new() }
    }

    /// Decides whether `pair` is emitted or dropped and updates the counters.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidRecord`] if either line cannot be parsed.
    pub fn process(&mut self, pair: &MatePair) -> Result<Decision> {
        let (r1, r2) = pair.records()?;
        let key = self.key_builder.build(r1.sequence(), r2.sequence());

        self.counters.total += 1;
        if self.seen.insert(key.as_bytes()) {
            Ok(Decision::Emit)
        } else {
            self.counters.removed += 1;
            trace!(
                "Dropping duplicate pair {} ({}:{} {})",
                r1.name(),
                r1.reference_name(),
                r1.position(),
                r1.cigar()
            );
            Ok(Decision::Drop)
        }
    }

    #[must_use]
    pub fn counters(&self) -> RunCounters {
        self.counters
    }
}

/// Streams assembled items into `sink`: header lines are forwarded as they arrive and
/// pairs are written only when [`DedupContext::process`] says to emit them.
///
/// # Errors
///
/// Returns the first read, parse, pairing, or write error.
pub fn deduplicate<I>(
    items: PairAssembler<I>,
    sink: &mut RecordSink,
    context: &mut DedupContext,
    progress: &ProgressTracker,
) -> Result<RunCounters>
where
    I: Iterator<Item = Result<String>>,
{
    for item in items {
        match item? {
            StreamItem::Header(line) => sink.write_header_line(&line)?,
            StreamItem::Pair(pair) => {
                if context.process(&pair)? == Decision::Emit {
                    sink.write_data_line(pair.first())?;
                    sink.write_data_line(pair.second())?;
                }
                progress.record(1);
            }
        }
    }
    Ok(context.counters())
}

/// Deduplicates one input file into `output`.
///
/// Preflight checks must already have passed. The input is opened afresh and the output
/// is created only once `layout` has been accepted; both are closed before returning.
///
/// # Errors
///
/// Returns [`DedupError::SingleEndInput`] for single-end layouts and otherwise any
/// error raised while streaming.
pub fn deduplicate_file(
    input: &Path,
    output: &Path,
    format: AlignmentFormat,
    layout: ReadLayout,
    progress: &ProgressTracker,
) -> Result<RunCounters> {
    if layout == ReadLayout::SingleEnd {
        return Err(DedupError::SingleEndInput { path: input.to_path_buf() });
    }

    let source = RecordSource::open(input)?;
    let mut sink = RecordSink::create(output, format)?;
    let mut context = DedupContext::new();

    let counters = deduplicate(PairAssembler::new(source, input), &mut sink, &mut context, progress)?;
    sink.finish()?;
    Ok(counters)
}
