//! Skeleton purge
//!
//! Restores a package-testing skeleton application to its pristine state:
//! framework caches, environment files, the SQLite database, generated
//! routes, storage contents and any configured extra files or directories
//! are removed.
//!
//! # Steps
//!
//! 1. Clear cached configuration, events, routes and compiled views
//! 2. Delete `.env` and `testbench.yaml`
//! 3. Delete the database, generated routes and storage contents
//! 4. Delete the configured `purge.files`
//! 5. Delete the configured `purge.directories`
//!
//! Deletions never abort the purge; every path ends up in the report.

pub mod cache;
pub mod delete;
pub mod paths;

pub use delete::{DeleteDirectories, DeleteFiles};

use crate::config::PurgeAttributes;
use crate::types::PortalError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment and harness files in the skeleton root
pub const ENVIRONMENT_FILES: [&str; 2] = [".env", "testbench.yaml"];

/// Literal runtime files
pub const RUNTIME_FILES: [&str; 1] = ["database/database.sqlite"];

/// Globs over runtime output
pub const RUNTIME_GLOBS: [&str; 4] = [
    "routes/testbench-*.php",
    "storage/app/public/*",
    "storage/app/*",
    "storage/framework/sessions/*",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// Why a path was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    /// A directory matched a file pattern
    NotAFile,
    /// A file matched a directory pattern
    NotADirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Deleted,
    Skipped(SkipReason),
    /// Removal failed with this error
    Failed(String),
}

/// What happened to one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeEntry {
    pub kind: PathKind,
    /// Path relative to the skeleton root
    pub path: String,
    pub outcome: Outcome,
}

impl fmt::Display for PurgeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PathKind::File => "File",
            PathKind::Directory => "Directory",
        };

        match &self.outcome {
            Outcome::Deleted => write!(f, "{} [{}] has been deleted", kind, self.path),
            Outcome::Skipped(SkipReason::Missing) => {
                write!(f, "{} [{}] doesn't exists ... SKIPPED", kind, self.path)
            }
            Outcome::Skipped(SkipReason::NotAFile) => {
                write!(f, "{} [{}] is a directory ... SKIPPED", kind, self.path)
            }
            Outcome::Skipped(SkipReason::NotADirectory) => {
                write!(f, "{} [{}] is not a directory ... SKIPPED", kind, self.path)
            }
            Outcome::Failed(error) => {
                write!(f, "{} [{}] could not be deleted: {} ... FAILED", kind, self.path, error)
            }
        }
    }
}

/// Outcome of every path the purge looked at, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub entries: Vec<PurgeEntry>,
}

impl PurgeReport {
    pub fn deleted(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Deleted))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    /// Whether every removal that was attempted succeeded
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }
}

/// Purge of one skeleton directory
#[derive(Debug, Clone)]
pub struct PurgeSkeleton {
    working_path: PathBuf,
    attributes: PurgeAttributes,
}

impl PurgeSkeleton {
    pub fn new(working_path: impl Into<PathBuf>, attributes: PurgeAttributes) -> Self {
        Self {
            working_path: working_path.into(),
            attributes,
        }
    }

    /// Run every purge step in order
    ///
    /// # Errors
    ///
    /// Returns a `Pattern` error if a configured glob is invalid. Failed
    /// deletions are not errors; they are recorded in the report.
    pub fn run(&self) -> Result<PurgeReport, PortalError> {
        let root = self.working_path.as_path();
        tracing::info!(working_path = %root.display(), "Purging skeleton");

        let mut entries = cache::clear(root)?;

        entries.extend(DeleteFiles::new(root).handle(join_all(root, &ENVIRONMENT_FILES)));

        let mut runtime = join_all(root, &RUNTIME_FILES);
        for pattern in RUNTIME_GLOBS {
            runtime.extend(paths::expand(root, pattern)?);
        }
        entries.extend(DeleteFiles::new(root).handle(runtime));

        let files = paths::resolve(root, &self.attributes.files)?;
        entries.extend(DeleteFiles::new(root).handle(files));

        let directories = paths::resolve(root, &self.attributes.directories)?;
        entries.extend(DeleteDirectories::new(root).handle(directories));

        let report = PurgeReport { entries };
        tracing::info!(
            deleted = report.deleted(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Skeleton purged"
        );
        Ok(report)
    }
}

/// Purge `working_path` with the given extra files and directories
pub fn purge(working_path: &Path, attributes: &PurgeAttributes) -> Result<PurgeReport, PortalError> {
    PurgeSkeleton::new(working_path, attributes.clone()).run()
}

fn join_all(root: &Path, files: &[&str]) -> Vec<PathBuf> {
    files.iter().map(|file| root.join(file)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, file: &str) {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[rstest]
    #[case::deleted(Outcome::Deleted, "File [.env] has been deleted")]
    #[case::missing(
        Outcome::Skipped(SkipReason::Missing),
        "File [.env] doesn't exists ... SKIPPED"
    )]
    #[case::failed(
        Outcome::Failed("permission denied".to_string()),
        "File [.env] could not be deleted: permission denied ... FAILED"
    )]
    fn test_entry_display(#[case] outcome: Outcome, #[case] expected: &str) {
        let entry = PurgeEntry {
            kind: PathKind::File,
            path: ".env".to_string(),
            outcome,
        };
        assert_eq!(entry.to_string(), expected);
    }

    #[test]
    fn test_purge_runtime_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for file in [
            ".env",
            "database/database.sqlite",
            "routes/testbench-api.php",
            "routes/web.php",
            "storage/app/public/avatar.png",
            "storage/app/public/.gitignore",
            "storage/app/export.csv",
            "storage/framework/sessions/abc",
        ] {
            touch(root, file);
        }

        let report = purge(root, &PurgeAttributes::default()).unwrap();

        assert!(report.is_clean());
        assert!(!root.join(".env").exists());
        assert!(!root.join("database/database.sqlite").exists());
        assert!(!root.join("routes/testbench-api.php").exists());
        assert!(root.join("routes/web.php").exists());
        assert!(!root.join("storage/app/public/avatar.png").exists());
        assert!(root.join("storage/app/public/.gitignore").exists());
        assert!(root.join("storage/app/public").is_dir());
        assert!(!root.join("storage/app/export.csv").exists());
        assert!(!root.join("storage/framework/sessions/abc").exists());
    }

    #[test]
    fn test_purge_configured_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "public/vendor/package/app.js");
        touch(root, "config/package.php");
        touch(root, "lang/en/package.php");

        let attributes = PurgeAttributes {
            files: vec![
                "config/package.php".to_string(),
                "config/*.yaml".to_string(),
            ],
            directories: vec!["public/vendor/*".to_string(), "lang/fr".to_string()],
        };
        let report = PurgeSkeleton::new(root, attributes).run().unwrap();

        assert!(!root.join("config/package.php").exists());
        assert!(!root.join("public/vendor/package").exists());
        assert!(root.join("lang/en/package.php").exists());

        let lines: Vec<String> = report
            .entries
            .iter()
            .filter(|entry| {
                entry.path.starts_with("config/")
                    || entry.path.starts_with("public/")
                    || entry.path.starts_with("lang/")
            })
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "File [config/package.php] has been deleted",
                "Directory [public/vendor/package] has been deleted",
                "Directory [lang/fr] doesn't exists ... SKIPPED",
            ]
        );
    }

    #[test]
    fn test_absolute_entries_never_leave_working_path() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "keep.txt");
        touch(outside.path(), "keepdir/data.txt");

        let attributes = PurgeAttributes {
            files: vec![outside.path().join("keep.txt").to_string_lossy().into_owned()],
            directories: vec![outside.path().join("keepdir").to_string_lossy().into_owned()],
        };
        let report = purge(dir.path(), &attributes).unwrap();

        assert!(outside.path().join("keep.txt").exists());
        assert!(outside.path().join("keepdir/data.txt").exists());
        let configured: Vec<&PurgeEntry> = report
            .entries
            .iter()
            .filter(|entry| entry.path.ends_with("keep.txt") || entry.path.ends_with("keepdir"))
            .collect();
        assert_eq!(configured.len(), 2);
        for entry in configured {
            assert_eq!(entry.outcome, Outcome::Skipped(SkipReason::Missing));
            assert!(!entry.path.starts_with('/'), "escaped root: {}", entry.path);
        }
    }

    #[test]
    fn test_invalid_configured_pattern() {
        let dir = TempDir::new().unwrap();
        let attributes = PurgeAttributes {
            files: vec!["config/[*.php".to_string()],
            directories: Vec::new(),
        };
        assert!(matches!(
            purge(dir.path(), &attributes),
            Err(PortalError::Pattern { .. })
        ));
    }
}
