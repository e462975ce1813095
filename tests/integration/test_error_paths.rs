//! Error path integration tests.
//!
//! These exercise the library directly: preflight checks, pairing, and the engine on
//! inputs that must be rejected.

use std::fs;

use seqdedup_lib::dedup::deduplicate_file;
use seqdedup_lib::errors::DedupError;
use seqdedup_lib::io::AlignmentFormat;
use seqdedup_lib::layout::{LayoutChoice, ReadLayout};
use seqdedup_lib::preflight::{MAX_ORDERING_PAIRS, run_preflight};
use seqdedup_lib::progress::ProgressTracker;
use tempfile::TempDir;

use crate::helpers::{SamBuilder, pair_lines};

const SEQ: &str = "GATTACAGATTACA";

#[test]
fn test_mismatch_beyond_scan_limit_is_not_checked() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("late_mismatch.sam");
    let (r1, _) = pair_lines("x", 1, SEQ, SEQ);
    let (_, r2) = pair_lines("y", 1, SEQ, SEQ);
    SamBuilder::new().unique_pairs(0, MAX_ORDERING_PAIRS).record(r1).record(r2).write_sam(&input);

    let report = run_preflight(&input, LayoutChoice::Auto).unwrap();
    assert!(report.scan.limit_reached);
    assert_eq!(report.scan.pairs_checked, MAX_ORDERING_PAIRS);
    assert_eq!(report.layout, ReadLayout::PairedEnd);
}

#[test]
fn test_header_line_between_mates() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("interleaved.sam");
    let output = tmp.path().join("out.sam");
    let (r1, r2) = pair_lines("frag", 1, SEQ, SEQ);
    SamBuilder::new().record(r1).record("@CO\tstray comment".to_string()).record(r2).write_sam(&input);

    let progress = ProgressTracker::new("pairs");
    let err = deduplicate_file(&input, &output, AlignmentFormat::Sam, ReadLayout::PairedEnd, &progress)
        .unwrap_err();
    assert!(matches!(err, DedupError::MalformedPairing { ref read_name, .. } if read_name == "frag"));
}

#[test]
fn test_record_with_too_few_fields() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("short.sam");
    let output = tmp.path().join("out.sam");
    SamBuilder::new()
        .record("frag\t99\tchr1\t1".to_string())
        .record("frag\t147\tchr1\t100".to_string())
        .write_sam(&input);

    // Names match, so preflight accepts the file
    run_preflight(&input, LayoutChoice::Paired).unwrap();

    let progress = ProgressTracker::new("pairs");
    let err = deduplicate_file(&input, &output, AlignmentFormat::Sam, ReadLayout::PairedEnd, &progress)
        .unwrap_err();
    assert!(matches!(err, DedupError::InvalidRecord { line_number: 3, .. }), "{err}");
}

#[test]
fn test_bam_that_is_not_bgzf() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("fake.bam");
    fs::write(&input, SamBuilder::new().unique_pairs(0, 2).text()).unwrap();

    let err = run_preflight(&input, LayoutChoice::Auto).unwrap_err();
    assert!(!matches!(err, DedupError::StreamEmpty { .. }), "{err}");
}

#[test]
fn test_single_end_by_flags() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("se.sam");
    SamBuilder::new()
        .record(format!("r1\t0\tchr1\t1\t60\t14M\t*\t0\t0\t{SEQ}\t*"))
        .record(format!("r1\t16\tchr1\t9\t60\t14M\t*\t0\t0\t{SEQ}\t*"))
        .write_sam(&input);

    let err = run_preflight(&input, LayoutChoice::Auto).unwrap_err();
    assert!(matches!(err, DedupError::SingleEndInput { .. }));
}
