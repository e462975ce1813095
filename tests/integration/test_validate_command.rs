//! End-to-end CLI tests for the validate command.

use tempfile::TempDir;

use crate::helpers::{
    SamBuilder, assert_failure_mentions, assert_success, pair_lines, run_seqdedup,
};

const SEQ: &str = "ACGTTGCAACGTTGCA";

#[test]
fn test_validate_passes_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("ok.sam");
    SamBuilder::new().unique_pairs(0, 50).write_sam(&input);

    let output = run_seqdedup(&["validate", "-i", input.to_str().unwrap()]);
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OK"), "{stderr}");
    assert!(stderr.contains("50 pairs checked"), "{stderr}");
    let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_validate_reports_each_failure() {
    let tmp = TempDir::new().unwrap();
    let good = tmp.path().join("good.sam");
    let sorted = tmp.path().join("sorted.sam");
    let mispaired = tmp.path().join("mispaired.sam");

    SamBuilder::new().unique_pairs(0, 3).write_sam(&good);
    SamBuilder::headerless()
        .header_line("@HD\tVN:1.6\tSO:coordinate")
        .unique_pairs(0, 3)
        .write_sam(&sorted);
    let (r1, _) = pair_lines("readA/1", 10, SEQ, SEQ);
    let (_, r2) = pair_lines("readB/2", 10, SEQ, SEQ);
    SamBuilder::new().record(r1).record(r2).write_sam(&mispaired);

    let output = run_seqdedup(&[
        "validate",
        "-i",
        good.to_str().unwrap(),
        sorted.to_str().unwrap(),
        mispaired.to_str().unwrap(),
    ]);
    assert_failure_mentions(&output, "2 of 3 inputs failed validation");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("position-sorted"), "{stderr}");
    assert!(stderr.contains("'readA/1' and 'readB/2'"), "{stderr}");
}

#[test]
fn test_validate_missing_input() {
    let output = run_seqdedup(&["validate", "-i", "/nonexistent/input.sam"]);
    assert_failure_mentions(&output, "does not exist");
}
