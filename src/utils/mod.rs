//! Small helpers shared by the command-line front end.

use std::path::PathBuf;

use crate::error::{CombineError, Result};

/// Expand glob patterns into paths, preserving argument order.
///
/// Matches of one pattern come out sorted. A plain path that matches
/// nothing is kept as is so that ingestion can report it as missing; a
/// wildcard pattern that matches nothing is an error.
pub fn expand_inputs<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matches = expand_pattern(pattern)?;

        if matches.is_empty() {
            if is_glob(pattern) {
                return Err(CombineError::other(format!(
                    "Pattern matched no files: {pattern}"
                )));
            }
            resolved.push(PathBuf::from(pattern));
        } else {
            resolved.extend(matches);
        }
    }

    Ok(resolved)
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| {
        CombineError::invalid_config(format!("Invalid pattern '{pattern}': {err}"))
    })?;

    paths
        .map(|entry| entry.map_err(|err| CombineError::other(err.to_string())))
        .collect()
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Format a byte count for display: `B`, `KB` or `MB` with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
