//! Validation of command-line paths and parameters.

use std::fs;
use std::path::Path;

use crate::errors::{DedupError, Result};
use crate::io::is_stdin_path;

/// Validate that a file exists
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use seqdedup_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.sam", "Input file");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.is_file() {
        return Err(DedupError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that `path` names a regular input file that can be read more than once.
///
/// Preflight scans an input before it is deduplicated, so standard input is refused.
///
/// # Errors
/// Returns an error for `-`, `/dev/stdin`, or a missing file
pub fn validate_input<P: AsRef<Path>>(path: P) -> Result<()> {
    let path_ref = path.as_ref();
    if is_stdin_path(path_ref) {
        return Err(DedupError::InvalidParameter {
            parameter: "input".to_string(),
            reason: "standard input cannot be used; each input is read twice".to_string(),
        });
    }
    validate_file_exists(path_ref, "Input file")
}

/// Validate that the output directory exists, creating it if needed.
///
/// # Errors
/// Returns an error if `dir` exists but is not a directory, or cannot be created
pub fn ensure_output_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.exists() {
        if !dir.is_dir() {
            return Err(DedupError::InvalidParameter {
                parameter: "output".to_string(),
                reason: format!("{} exists and is not a directory", dir.display()),
            });
        }
        return Ok(());
    }
    fs::create_dir_all(dir)
        .map_err(|e| DedupError::io(format!("creating output directory {}", dir.display()), e))
}

/// Validate that a value is positive
///
/// # Errors
/// Returns an error if `value` is zero
pub fn validate_positive(value: u64, name: &str) -> Result<()> {
    if value == 0 {
        return Err(DedupError::InvalidParameter {
            parameter: name.to_string(),
            reason: "Must be positive".to_string(),
        });
    }
    Ok(())
}
