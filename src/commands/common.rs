//! Common CLI options shared across commands.
//!
//! These structures are composed into command structs using `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use seqdedup_lib::layout::LayoutChoice;
use seqdedup_lib::validation::validate_input;

/// Input files and how to interpret them.
#[derive(Debug, Clone, Args)]
pub struct InputOptions {
    /// Mate-adjacent SAM, gzip-compressed SAM, or BAM files
    #[arg(short = 'i', long = "input", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Read layout of the inputs
    #[arg(short = 'l', long = "layout", value_enum, default_value_t = LayoutChoice::Auto)]
    pub layout: LayoutChoice,
}

impl InputOptions {
    /// Validates that every input is an existing regular file.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid input.
    pub fn validate(&self) -> anyhow::Result<()> {
        for input in &self.inputs {
            validate_input(input)?;
        }
        Ok(())
    }
}
