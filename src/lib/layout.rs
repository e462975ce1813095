//! Read layout (paired-end vs single-end).
//!
//! The dedup engine only accepts an explicit [`ReadLayout`]. Working the layout out from
//! header text is a heuristic, so it lives here as a separate pre-step that callers may
//! run before handing a concrete value to the engine.

use clap::ValueEnum;
use noodles::sam::alignment::record::Flags;

use crate::record::{AlignmentRecord, header_tag};

/// Sequencing layout of an alignment stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLayout {
    PairedEnd,
    SingleEnd,
}

/// Layout as requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LayoutChoice {
    /// Infer from `@PG` command lines, falling back to the flags of the first record
    #[default]
    Auto,
    /// Paired-end input
    Paired,
    /// Single-end input (rejected by the deduplicator)
    Single,
}

impl LayoutChoice {
    /// Returns the explicit layout, if one was requested.
    #[must_use]
    pub fn explicit(self) -> Option<ReadLayout> {
        match self {
            Self::Auto => None,
            Self::Paired => Some(ReadLayout::PairedEnd),
            Self::Single => Some(ReadLayout::SingleEnd),
        }
    }
}

/// Infers the layout from one `@PG` header line.
///
/// Aligner invocations that name separate mate files (`-1 ... -2 ...`) or pass a
/// paired-end switch are taken as paired-end; invocations with `-U` or `--single_end`
/// as single-end.
#[must_use]
pub fn layout_from_program_line(line: &str) -> Option<ReadLayout> {
    if header_tag(line) != Some(*b"PG") {
        return None;
    }
    let command_line = line.split('\t').find_map(|field| field.strip_prefix("CL:"))?;
    let args: Vec<&str> = command_line.split_whitespace().collect();

    let has = |flag: &str| args.iter().any(|a| *a == flag);
    if (has("-1") && has("-2")) || has("--paired") || has("--pe") {
        Some(ReadLayout::PairedEnd)
    } else if has("-U") || has("--single_end") || has("--se") {
        Some(ReadLayout::SingleEnd)
    } else {
        None
    }
}

/// Infers the layout from the header lines and, failing that, the first data line.
///
/// Header evidence takes precedence; the last `@PG` line that says anything wins. A first
/// record without the segmented (`0x1`) flag indicates single-end data.
#[must_use]
pub fn infer_layout<'a, H>(header_lines: H, first_data_line: Option<&str>) -> Option<ReadLayout>
where
    H: IntoIterator<Item = &'a str>,
{
    let from_header = header_lines.into_iter().filter_map(layout_from_program_line).last();
    from_header.or_else(|| {
        let record = AlignmentRecord::parse(first_data_line?, 1).ok()?;
        Some(layout_from_flags(record.flags()))
    })
}

fn layout_from_flags(flags: Flags) -> ReadLayout {
    if flags.is_segmented() { ReadLayout::PairedEnd } else { ReadLayout::SingleEnd }
}
