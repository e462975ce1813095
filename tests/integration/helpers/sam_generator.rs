//! Builders for synthetic mate-adjacent SAM inputs.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use seqdedup_lib::io::{AlignmentFormat, RecordSink};

/// Length of the reference sequence declared in the default header.
pub const REFERENCE_LENGTH: u32 = 1_000_000;

/// Builds one SAM data line with all mandatory fields.
pub fn sam_line(name: &str, flag: u16, pos: u32, mate_pos: u32, seq: &str) -> String {
    format!(
        "{name}\t{flag}\tchr1\t{pos}\t60\t{}M\t=\t{mate_pos}\t0\t{seq}\t{}",
        seq.len(),
        "I".repeat(seq.len())
    )
}

/// Returns the two lines of a properly paired fragment.
pub fn pair_lines(name: &str, pos: u32, seq1: &str, seq2: &str) -> (String, String) {
    let mate_pos = pos + 200;
    (sam_line(name, 99, pos, mate_pos, seq1), sam_line(name, 147, mate_pos, pos, seq2))
}

/// A distinct sequence of `len` bases for each `index`.
pub fn unique_sequence(index: u64, len: usize) -> String {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];
    let mut seq = String::with_capacity(len);
    let mut value = index;
    for _ in 0..len {
        seq.push(BASES[(value % 4) as usize]);
        value /= 4;
    }
    seq
}

/// Accumulates header and data lines and writes them as SAM, gzip SAM, or BAM.
#[derive(Debug, Clone)]
pub struct SamBuilder {
    header: Vec<String>,
    records: Vec<String>,
}

impl Default for SamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SamBuilder {
    /// Starts with an unsorted `@HD` line and a single reference `chr1`.
    pub fn new() -> Self {
        Self {
            header: vec![
                "@HD\tVN:1.6\tSO:unsorted".to_string(),
                format!("@SQ\tSN:chr1\tLN:{REFERENCE_LENGTH}"),
            ],
            records: Vec::new(),
        }
    }

    /// Starts with no header lines at all.
    pub fn headerless() -> Self {
        Self { header: Vec::new(), records: Vec::new() }
    }

    pub fn header_line(mut self, line: &str) -> Self {
        self.header.push(line.to_string());
        self
    }

    pub fn pair(mut self, name: &str, pos: u32, seq1: &str, seq2: &str) -> Self {
        let (r1, r2) = pair_lines(name, pos, seq1, seq2);
        self.records.push(r1);
        self.records.push(r2);
        self
    }

    pub fn record(mut self, line: String) -> Self {
        self.records.push(line);
        self
    }

    /// Adds `count` pairs with unique sequences, named `frag_<offset + i>`.
    pub fn unique_pairs(mut self, offset: u64, count: u64) -> Self {
        for i in offset..offset + count {
            let seq1 = unique_sequence(i, 60);
            let seq2 = unique_sequence(i.wrapping_mul(7919), 60);
            self = self.pair(&format!("frag_{i}"), 1000, &seq1, &seq2);
        }
        self
    }

    pub fn header_lines(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[String] {
        &self.records
    }

    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in self.header.iter().chain(&self.records) {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    pub fn write_sam(&self, path: &Path) {
        fs::write(path, self.text()).expect("Failed to write SAM");
    }

    pub fn write_sam_gz(&self, path: &Path) {
        let mut encoder =
            GzEncoder::new(File::create(path).expect("Failed to create file"), Compression::fast());
        encoder.write_all(self.text().as_bytes()).expect("Failed to write gzip SAM");
        encoder.finish().expect("Failed to finish gzip stream");
    }

    pub fn write_bam(&self, path: &Path) {
        let mut sink = RecordSink::create(path, AlignmentFormat::Bam).expect("Failed to create BAM");
        for line in &self.header {
            sink.write_header_line(line).expect("Failed to write header line");
        }
        for line in &self.records {
            sink.write_data_line(line).expect("Failed to write record");
        }
        sink.finish().expect("Failed to finish BAM");
    }
}
