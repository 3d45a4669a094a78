//! Path resolution for purge lists
//!
//! Patterns are relative to the skeleton root. A pattern containing `*` is
//! expanded with a single-level glob; anything else is taken literally.
//! Entries never leave the root: leading separators, `.` and `..` are dropped.

use crate::types::PortalError;
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};

/// Shell-like matching: `*` never crosses `/` and never matches a leading dot
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand a glob relative to `root`, sorted
///
/// The root itself is escaped so that brackets or stars in the skeleton
/// location are matched literally.
///
/// # Errors
///
/// Returns a `Pattern` error if the pattern cannot be compiled.
pub fn expand(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, PortalError> {
    let full = format!(
        "{}/{}",
        Pattern::escape(&root.to_string_lossy()),
        confine(pattern).to_string_lossy()
    );

    let mut paths: Vec<PathBuf> = glob_with(&full, MATCH_OPTIONS)
        .map_err(|e| PortalError::pattern(pattern, e.msg))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "Skipping unreadable path");
                None
            }
        })
        .collect();
    paths.sort();

    Ok(paths)
}

/// Resolve configured entries into concrete paths
///
/// Literal entries are kept even when they do not exist, so that the purge
/// can report them as skipped. Globs that match nothing contribute nothing.
pub fn resolve(root: &Path, entries: &[String]) -> Result<Vec<PathBuf>, PortalError> {
    let mut paths = Vec::new();
    for entry in entries {
        if entry.contains('*') {
            paths.extend(expand(root, entry)?);
        } else {
            paths.push(root.join(confine(entry)));
        }
    }
    Ok(paths)
}

/// Keep only the normal components of `entry`, so joining it stays under the root
fn confine(entry: &str) -> PathBuf {
    Path::new(entry)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Display form of `path` relative to `root`
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
