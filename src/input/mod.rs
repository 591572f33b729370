//! URL list input
//!
//! The URL list is a plain text file with one absolute URL per line. Lines
//! are trimmed, and blank lines and `#` comments are skipped. Lines are not
//! validated here; malformed URLs reach the crawler and are recorded as
//! skips so they still show up in the report.

use crate::ScrapeError;
use std::path::Path;

/// Reads the URL list at `path`
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The URLs in file order, duplicates kept
/// * `Err(ScrapeError::Input)` - The file could not be read
pub fn read_url_list(path: &Path) -> Result<Vec<String>, ScrapeError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScrapeError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_url_list(&content))
}

/// Splits URL list text into entries
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
