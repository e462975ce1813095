//! Preflight checks without deduplication.

use anyhow::{Result, bail};
use clap::Parser;
use log::{error, info};

use seqdedup_lib::metrics::format_count;
use seqdedup_lib::preflight::run_preflight;

use crate::commands::command::Command;
use crate::commands::common::InputOptions;

/// Runs the truncation, emptiness and mate-ordering checks on each input.
#[derive(Debug, Parser)]
#[command(
    name = "validate",
    about = "\x1b[38;5;180m[VALIDATE]\x1b[0m      \x1b[36mCheck inputs are complete and mate-adjacent\x1b[0m",
    long_about = r#"
Runs the checks performed before deduplication without writing any output:

1. The input is not truncated (BAM inputs must end with the BGZF end-of-file marker)
2. The input contains at least one line
3. The input is not position-sorted and, for the first 100,000 pairs, every two
   consecutive records share a read name (ignoring a trailing /1 or /2)

The read layout is resolved as for `dedup`, and single-end inputs are reported as failures.
"#
)]
pub struct Validate {
    #[command(flatten)]
    pub input: InputOptions,
}

impl Command for Validate {
    fn execute(&self, _command_line: &str) -> Result<()> {
        self.input.validate()?;

        let mut failures = 0usize;
        for input in &self.input.inputs {
            match run_preflight(input, self.input.layout) {
                Ok(report) => {
                    let limit = if report.scan.limit_reached { " (limit reached)" } else { "" };
                    info!(
                        "{}: OK, {:?}, {} pairs checked{limit}",
                        input.display(),
                        report.layout,
                        format_count(report.scan.pairs_checked)
                    );
                }
                Err(e) => {
                    error!("{}: {e}", input.display());
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            bail!("{failures} of {} inputs failed validation", self.input.inputs.len());
        }
        Ok(())
    }
}
