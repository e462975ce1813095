#![deny(unsafe_code)]
#![allow(
    clippy::cast_precision_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # seqdedup - sequence-based deduplication of paired-end alignments
//!
//! Removes PCR/optical duplicate mate pairs from mate-adjacent SAM/BAM files by comparing
//! read sequences rather than alignment coordinates. Two pairs are duplicates when the
//! first 50 bases of read 1, joined with the reverse complement of read 2, are identical
//! (see [`key`]). The first pair with a given key is kept; later ones are dropped.
//!
//! ## Overview
//!
//! ### Core Functionality
//!
//! - **[`preflight`]** - Truncation, emptiness and mate-ordering checks run before a file
//!   is deduplicated
//! - **[`dedup`]** - The streaming deduplication engine
//! - **[`key`]** - Dedup key construction
//! - **[`pair`]** - Grouping of consecutive records into mate pairs
//!
//! ### Utilities
//!
//! - **[`io`]** - SAM, gzip-compressed SAM and BAM line sources and sinks
//! - **[`record`]** - Minimal parsing of SAM text lines
//! - **[`layout`]** - Paired-end/single-end layout inference
//! - **[`metrics`]** - Per-file metrics and the TSV writer
//! - **[`validation`]**, **[`progress`]**, **[`logging`]**
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use seqdedup_lib::dedup::deduplicate_file;
//! use seqdedup_lib::io::AlignmentFormat;
//! use seqdedup_lib::layout::LayoutChoice;
//! use seqdedup_lib::preflight::run_preflight;
//! use seqdedup_lib::progress::ProgressTracker;
//!
//! # fn main() -> seqdedup_lib::errors::Result<()> {
//! let input = Path::new("sample.sam");
//! let report = run_preflight(input, LayoutChoice::Auto)?;
//! let progress = ProgressTracker::new("Processed mate pairs");
//! let counters = deduplicate_file(
//!     input,
//!     Path::new("sample.deduplicated.sam"),
//!     AlignmentFormat::Sam,
//!     report.layout,
//!     &progress,
//! )?;
//! println!("removed {} of {} pairs", counters.removed, counters.total);
//! # Ok(())
//! # }
//! ```

pub mod dedup;
pub mod dna;
pub mod errors;
pub mod io;
pub mod key;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod pair;
pub mod preflight;
pub mod progress;
pub mod record;
pub mod validation;
