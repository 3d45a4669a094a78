//! Framework cache files left behind by a booted skeleton

use super::delete::DeleteFiles;
use super::paths::expand;
use super::PurgeEntry;
use crate::types::PortalError;
use std::path::Path;

/// Cached configuration, events and routes
pub const CACHE_FILES: [&str; 3] = [
    "bootstrap/cache/config.php",
    "bootstrap/cache/events.php",
    "bootstrap/cache/routes-v7.php",
];

/// Compiled Blade views
pub const COMPILED_VIEWS: &str = "storage/framework/views/*";

/// Remove cached configuration, events, routes and compiled views
pub fn clear(working_path: &Path) -> Result<Vec<PurgeEntry>, PortalError> {
    let mut files: Vec<_> = CACHE_FILES
        .iter()
        .map(|file| working_path.join(file))
        .collect();
    files.extend(expand(working_path, COMPILED_VIEWS)?);

    Ok(DeleteFiles::new(working_path).handle(files))
}
