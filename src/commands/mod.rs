//! CLI command implementations for seqdedup.
//!
//! - [`dedup`] - Remove duplicate mate pairs by read sequence
//! - [`validate`] - Run the preflight checks only

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod command;
pub mod common;
pub mod dedup;
pub mod validate;
