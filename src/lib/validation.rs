//! Input validation utilities
//!
//! Validation for command-line parameters and file paths, with errors from
//! [`crate::errors`].

use std::fmt::Display;
use std::path::Path;

use crate::errors::{FgmergeError, Result};

/// Validate that a file exists
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use fgmerge_lib::validation::validate_file_exists;
///
/// assert!(validate_file_exists("/nonexistent/r1.fq", "R1 FASTQ").is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.is_file() {
        return Err(FgmergeError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that multiple files exist, reporting the first that does not
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Validate that the directory an output file will be written into exists
///
/// A bare file name refers to the current directory and is always accepted.
pub fn validate_output_dir<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    match path_ref.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(FgmergeError::InvalidFileFormat {
                file_type: description.to_string(),
                path: path_ref.display().to_string(),
                reason: format!("Output directory does not exist: {}", parent.display()),
            })
        }
        _ => Ok(()),
    }
}

/// Validate that a value is strictly positive
///
/// # Example
/// ```
/// use fgmerge_lib::validation::validate_positive;
///
/// assert!(validate_positive(1usize, "batch-size").is_ok());
/// assert!(validate_positive(0usize, "batch-size").is_err());
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(FgmergeError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be positive, got {value}"),
        });
    }
    Ok(())
}

/// Validate that two optional parameters are either both given or both omitted
pub fn validate_both_or_neither<A, B>(
    first: Option<A>,
    second: Option<B>,
    first_name: &str,
    second_name: &str,
) -> Result<()> {
    match (first.is_some(), second.is_some()) {
        (true, false) => Err(FgmergeError::InvalidParameter {
            parameter: second_name.to_string(),
            reason: format!("must be given when {first_name} is given"),
        }),
        (false, true) => Err(FgmergeError::InvalidParameter {
            parameter: first_name.to_string(),
            reason: format!("must be given when {second_name} is given"),
        }),
        _ => Ok(()),
    }
}

/// Validate that no two of the given paths are the same file name
///
/// Catches an output that would overwrite an input or another output.
pub fn validate_distinct_paths<P: AsRef<Path>>(paths: &[(P, &str)]) -> Result<()> {
    for (i, (path, desc)) in paths.iter().enumerate() {
        if let Some((_, other)) = paths[..i].iter().find(|(p, _)| p.as_ref() == path.as_ref()) {
            return Err(FgmergeError::InvalidParameter {
                parameter: (*desc).to_string(),
                reason: format!("'{}' is also given as {other}", path.as_ref().display()),
            });
        }
    }
    Ok(())
}
