//! Assertion and I/O helpers for inspecting command outputs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use fgoxide::io::DelimFile;
use seqdedup_lib::io::RecordSource;
use seqdedup_lib::metrics::DedupMetrics;

/// Runs the seqdedup binary with `args`.
pub fn run_seqdedup(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seqdedup"))
        .args(args)
        .output()
        .expect("Failed to execute seqdedup")
}

/// Runs `seqdedup dedup` on `inputs`, writing into `output_dir`, with extra `args`.
pub fn run_dedup(inputs: &[&Path], output_dir: &Path, args: &[&str]) -> Output {
    let mut all: Vec<String> = vec!["dedup".to_string(), "--input".to_string()];
    all.extend(inputs.iter().map(|p| p.to_str().expect("non-UTF-8 path").to_string()));
    all.push("--output".to_string());
    all.push(output_dir.to_str().expect("non-UTF-8 path").to_string());
    all.extend(args.iter().map(ToString::to_string));
    let refs: Vec<&str> = all.iter().map(String::as_str).collect();
    run_seqdedup(&refs)
}

/// Reads every line (header and data) from a SAM, gzip SAM, or BAM file.
pub fn read_lines(path: &Path) -> Vec<String> {
    RecordSource::open(path)
        .expect("Failed to open output")
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to read output")
}

/// Reads only the data lines.
pub fn read_data_lines(path: &Path) -> Vec<String> {
    read_lines(path).into_iter().filter(|l| !l.starts_with('@')).collect()
}

/// Reads the single row of a metrics file.
pub fn read_metrics(path: &Path) -> DedupMetrics {
    let mut rows: Vec<DedupMetrics> =
        DelimFile::default().read_tsv(&path).expect("Failed to read metrics");
    assert_eq!(rows.len(), 1, "expected exactly one metrics row in {}", path.display());
    rows.remove(0)
}

pub fn output_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    dir.join(format!("{stem}.deduplicated.{extension}"))
}

pub fn metrics_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}.dedup_metrics.txt"))
}

/// Asserts the command succeeded, printing its stderr otherwise.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Asserts the command failed and its stderr mentions `needle`.
pub fn assert_failure_mentions(output: &Output, needle: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "command unexpectedly succeeded: {stderr}");
    assert!(stderr.contains(needle), "stderr does not mention '{needle}': {stderr}");
}

/// Asserts `sub` is a subsequence of `full`, i.e. appears in the same relative order.
pub fn assert_subsequence(sub: &[String], full: &[String]) {
    let mut rest = full.iter();
    for line in sub {
        assert!(rest.any(|l| l == line), "line out of order or missing: {line}");
    }
}
