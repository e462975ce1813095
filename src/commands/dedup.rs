//! Sequence-based removal of duplicate mate pairs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use seqdedup_lib::dedup::{RunCounters, deduplicate_file};
use seqdedup_lib::io::{AlignmentFormat, file_stem};
use seqdedup_lib::logging::{OperationTimer, log_dedup_summary};
use seqdedup_lib::metrics::{DedupMetrics, write_metrics_auto};
use seqdedup_lib::preflight::run_preflight;
use seqdedup_lib::progress::{DEFAULT_PROGRESS_INTERVAL, ProgressTracker};
use seqdedup_lib::validation::{ensure_output_dir, validate_positive};

use crate::commands::command::Command;
use crate::commands::common::InputOptions;

/// Suffix inserted between the input stem and the output extension.
const OUTPUT_SUFFIX: &str = "deduplicated";

/// File name suffix of the per-input metrics file.
const METRICS_SUFFIX: &str = "dedup_metrics.txt";

/// Container format for deduplicated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Same format as the input
    #[default]
    Auto,
    /// Plain-text SAM
    Sam,
    /// BAM
    Bam,
}

impl OutputFormat {
    fn resolve(self, input_format: AlignmentFormat) -> AlignmentFormat {
        match self {
            Self::Auto => input_format,
            Self::Sam => AlignmentFormat::Sam,
            Self::Bam => AlignmentFormat::Bam,
        }
    }
}

/// Paths written for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputPaths {
    records: PathBuf,
    metrics: PathBuf,
}

impl OutputPaths {
    fn new(dir: &Path, input: &Path, format: AlignmentFormat) -> Self {
        let stem = file_stem(input);
        Self {
            records: dir.join(format!("{stem}.{OUTPUT_SUFFIX}.{}", format.extension())),
            metrics: dir.join(format!("{stem}.{METRICS_SUFFIX}")),
        }
    }

    /// Removes whatever was written so far; a failed file leaves nothing behind.
    fn remove(&self) {
        for path in [&self.records, &self.metrics] {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!("Could not remove partial output {}: {e}", path.display());
                }
            }
        }
    }
}

/// Sequence-based duplicate removal command.
#[derive(Debug, Parser)]
#[command(
    name = "dedup",
    about = "\x1b[38;5;151m[DEDUP]\x1b[0m         \x1b[36mRemove duplicate mate pairs by read sequence\x1b[0m",
    long_about = r#"
Removes duplicate mate pairs from paired-end SAM/BAM files by comparing read sequences
instead of alignment coordinates.

Two pairs are duplicates when the first 50 bases of read 1, joined with the first 50
bases of the reverse complement of read 2, are identical. The first pair with a given
key is kept; later ones are removed. Header lines and kept pairs are written unchanged
and in input order.

# Input Requirements

- Paired-end reads with mates on adjacent lines, e.g. the unsorted output of the
  aligner or the result of `samtools sort -n`
- Not position-sorted (`SO:coordinate` inputs are rejected)
- Not truncated; BAM inputs must carry the BGZF end-of-file marker
- Regular files: each input is scanned once before it is deduplicated

# Outputs

For each input `<stem>.{sam,sam.gz,bam}` two files are written to the output directory:

- `<stem>.deduplicated.<ext>` - the deduplicated records
- `<stem>.dedup_metrics.txt` - total, removed and retained pair counts

Inputs are processed one after another. A failed input has its partial outputs removed
and the remaining inputs are still processed unless `--fail-fast` is given.
"#
)]
pub struct Dedup {
    #[command(flatten)]
    pub input: InputOptions,

    /// Output directory, created if missing
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Format of the deduplicated output
    #[arg(short = 'f', long = "output-format", value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,

    /// Stop at the first input that fails
    #[arg(long = "fail-fast", default_value = "false")]
    pub fail_fast: bool,

    /// Number of mate pairs between progress messages
    #[arg(long = "progress-interval", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,
}

impl Command for Dedup {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.input.validate()?;
        validate_positive(self.progress_interval, "progress-interval")?;
        ensure_output_dir(&self.output)?;
        self.check_output_collisions()?;

        info!("Starting dedup");
        info!("Command line: {command_line}");
        info!("Inputs: {}", self.input.inputs.len());
        info!("Output directory: {}", self.output.display());
        info!("Layout: {:?}", self.input.layout);

        let mut failed: Vec<&Path> = Vec::new();
        for input in &self.input.inputs {
            if let Err(e) = self.process_file(input) {
                if self.fail_fast {
                    return Err(e);
                }
                error!("{e:#}");
                failed.push(input);
            }
        }

        if !failed.is_empty() {
            let names: Vec<String> = failed.iter().map(|p| p.display().to_string()).collect();
            bail!(
                "{} of {} inputs failed: {}",
                failed.len(),
                self.input.inputs.len(),
                names.join(", ")
            );
        }
        info!("Done");
        Ok(())
    }
}

impl Dedup {
    fn output_paths(&self, input: &Path) -> OutputPaths {
        let format = self.output_format.resolve(AlignmentFormat::from_path(input));
        OutputPaths::new(&self.output, input, format)
    }

    /// Two inputs with the same stem would overwrite each other's records or metrics.
    fn check_output_collisions(&self) -> Result<()> {
        let mut seen: Vec<(PathBuf, &Path)> = Vec::with_capacity(2 * self.input.inputs.len());
        for input in &self.input.inputs {
            let paths = self.output_paths(input);
            for path in [paths.records, paths.metrics] {
                if let Some((_, other)) = seen.iter().find(|(p, _)| *p == path) {
                    bail!(
                        "Inputs {} and {} would both be written to {}",
                        other.display(),
                        input.display(),
                        path.display()
                    );
                }
                seen.push((path, input));
            }
        }
        Ok(())
    }

    fn process_file(&self, input: &Path) -> Result<RunCounters> {
        let timer = OperationTimer::new(&format!("Deduplicating {}", input.display()));

        let report = run_preflight(input, self.input.layout)
            .with_context(|| format!("Preflight failed for {}", input.display()))?;

        let format = self.output_format.resolve(AlignmentFormat::from_path(input));
        let paths = self.output_paths(input);
        info!("Writing {}", paths.records.display());

        let progress = ProgressTracker::new(format!("Processed mate pairs from {}", input.display()))
            .with_interval(self.progress_interval);

        let result = deduplicate_file(input, &paths.records, format, report.layout, &progress)
            .with_context(|| format!("Failed to deduplicate {}", input.display()))
            .and_then(|counters| {
                let metrics = DedupMetrics::from_counters(file_name(input), &counters);
                write_metrics_auto(&paths.metrics, &[metrics])?;
                Ok(counters)
            });

        match result {
            Ok(counters) => {
                progress.log_final();
                log_dedup_summary(&file_name(input), &counters);
                timer.log_completion(counters.total);
                Ok(counters)
            }
            Err(e) => {
                paths.remove();
                Err(e)
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
