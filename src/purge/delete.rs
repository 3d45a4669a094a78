//! Deletion actions
//!
//! Each path is handled independently: a missing path is skipped and a
//! failed removal is recorded, neither stops the remaining deletions.

use super::paths::relative;
use super::{Outcome, PathKind, PurgeEntry, SkipReason};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Placeholder files that keep otherwise empty directories under version control
const PRESERVED: [&str; 2] = [".gitkeep", ".gitignore"];

/// Deletes individual files
#[derive(Debug, Clone, Copy)]
pub struct DeleteFiles<'a> {
    working_path: &'a Path,
}

impl<'a> DeleteFiles<'a> {
    pub fn new(working_path: &'a Path) -> Self {
        Self { working_path }
    }

    pub fn handle<I>(&self, files: I) -> Vec<PurgeEntry>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        files
            .into_iter()
            .filter(|file| !is_preserved(file))
            .map(|file| {
                let outcome = match fs::symlink_metadata(&file) {
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        Outcome::Skipped(SkipReason::Missing)
                    }
                    Ok(metadata) if metadata.is_dir() => Outcome::Skipped(SkipReason::NotAFile),
                    _ => removal_outcome(fs::remove_file(&file)),
                };
                record(self.working_path, PathKind::File, &file, outcome)
            })
            .collect()
    }
}

/// Deletes directories with everything below them
#[derive(Debug, Clone, Copy)]
pub struct DeleteDirectories<'a> {
    working_path: &'a Path,
}

impl<'a> DeleteDirectories<'a> {
    pub fn new(working_path: &'a Path) -> Self {
        Self { working_path }
    }

    pub fn handle<I>(&self, directories: I) -> Vec<PurgeEntry>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        directories
            .into_iter()
            .map(|directory| {
                let outcome = match fs::symlink_metadata(&directory) {
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        Outcome::Skipped(SkipReason::Missing)
                    }
                    Ok(metadata) if !metadata.is_dir() => {
                        Outcome::Skipped(SkipReason::NotADirectory)
                    }
                    _ => removal_outcome(fs::remove_dir_all(&directory)),
                };
                record(self.working_path, PathKind::Directory, &directory, outcome)
            })
            .collect()
    }
}

fn is_preserved(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| PRESERVED.contains(&name))
}

fn removal_outcome(result: io::Result<()>) -> Outcome {
    match result {
        Ok(()) => Outcome::Deleted,
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

fn record(working_path: &Path, kind: PathKind, path: &Path, outcome: Outcome) -> PurgeEntry {
    let location = relative(working_path, path);

    match &outcome {
        Outcome::Deleted => tracing::info!(path = %location, ?kind, "Deleted"),
        Outcome::Skipped(reason) => tracing::debug!(path = %location, ?kind, ?reason, "Skipped"),
        Outcome::Failed(error) => {
            tracing::warn!(path = %location, ?kind, error = %error, "Failed to delete")
        }
    }

    PurgeEntry {
        kind,
        path: location,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_delete_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join(".env"), "APP_KEY=").unwrap();
        fs::write(root.join(".gitignore"), "*").unwrap();
        fs::create_dir(root.join("public")).unwrap();

        let entries = DeleteFiles::new(root).handle(vec![
            root.join(".env"),
            root.join(".gitignore"),
            root.join("public"),
            root.join("testbench.yaml"),
        ]);

        assert_eq!(
            entries,
            vec![
                PurgeEntry {
                    kind: PathKind::File,
                    path: ".env".to_string(),
                    outcome: Outcome::Deleted,
                },
                PurgeEntry {
                    kind: PathKind::File,
                    path: "public".to_string(),
                    outcome: Outcome::Skipped(SkipReason::NotAFile),
                },
                PurgeEntry {
                    kind: PathKind::File,
                    path: "testbench.yaml".to_string(),
                    outcome: Outcome::Skipped(SkipReason::Missing),
                },
            ]
        );
        assert!(!root.join(".env").exists());
        assert!(root.join(".gitignore").exists());
        assert!(root.join("public").is_dir());
    }

    #[test]
    fn test_delete_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("public/vendor/css")).unwrap();
        fs::write(root.join("public/vendor/css/app.css"), "").unwrap();
        fs::write(root.join("public/index.php"), "").unwrap();

        let entries = DeleteDirectories::new(root).handle(vec![
            root.join("public/vendor"),
            root.join("public/index.php"),
            root.join("lang"),
        ]);

        let outcomes: Vec<&Outcome> = entries.iter().map(|entry| &entry.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                &Outcome::Deleted,
                &Outcome::Skipped(SkipReason::NotADirectory),
                &Outcome::Skipped(SkipReason::Missing),
            ]
        );
        assert!(!root.join("public/vendor").exists());
        assert!(root.join("public/index.php").exists());
    }
}
