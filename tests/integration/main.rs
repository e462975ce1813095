//! Integration tests for the seqdedup binary and library.
//!
//! These tests run the compiled binary against generated SAM, gzip SAM, and BAM inputs
//! and inspect the files it writes.

mod helpers;
mod test_error_paths;
mod test_validate_command;
