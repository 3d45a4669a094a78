//! `purge-skeleton` command
//!
//! Reads the purge lists from the harness configuration, purges the skeleton
//! and prints one line per path.

use crate::cli::PurgeArgs;
use crate::command::PortalCommand;
use crate::config::TestbenchConfig;
use crate::purge::PurgeSkeleton;
use crate::types::PortalError;
use std::io::Write;

#[derive(Debug)]
pub struct PurgeCommand {
    args: PurgeArgs,
}

impl PurgeCommand {
    pub fn new(args: PurgeArgs) -> Self {
        Self { args }
    }
}

impl PortalCommand for PurgeCommand {
    fn run(&self, output: &mut dyn Write) -> Result<(), PortalError> {
        let working_path = &self.args.working_path;
        if !working_path.is_dir() {
            return Err(PortalError::IoError {
                message: format!(
                    "Working path '{}' is not a directory",
                    working_path.display()
                ),
            });
        }

        // Read before purging: the purge deletes testbench.yaml
        let config = TestbenchConfig::load(&self.args.config_path())?;
        let report = PurgeSkeleton::new(working_path, config.purge).run()?;

        for entry in &report.entries {
            writeln!(output, "{}", entry)?;
        }
        output.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_lists_before_deleting_config() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(
            root.join("testbench.yaml"),
            "purge:\n  files:\n    - config/package.php\n",
        )
        .unwrap();
        fs::create_dir(root.join("config")).unwrap();
        fs::write(root.join("config/package.php"), "<?php").unwrap();

        let command = PurgeCommand::new(PurgeArgs {
            working_path: root.to_path_buf(),
            config: None,
        });
        let mut output = Vec::new();
        command.run(&mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("File [testbench.yaml] has been deleted\n"));
        assert!(output.contains("File [config/package.php] has been deleted\n"));
        assert!(output.contains("File [.env] doesn't exists ... SKIPPED\n"));
        assert!(!root.join("config/package.php").exists());
    }

    #[test]
    fn test_missing_working_path() {
        let command = PurgeCommand::new(PurgeArgs {
            working_path: "/nonexistent/skeleton".into(),
            config: None,
        });
        let err = command.run(&mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }
}
