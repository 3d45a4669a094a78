//! Package-testing harness configuration
//!
//! Only the `purge` section of `testbench.yaml` matters here; every other key
//! belongs to the harness and is ignored.

use crate::types::PortalError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TestbenchConfig {
    #[serde(default)]
    pub purge: PurgeAttributes,
}

/// Extra paths the skeleton purge removes, relative to the skeleton root
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PurgeAttributes {
    pub files: Vec<String>,
    pub directories: Vec<String>,
}

impl TestbenchConfig {
    /// Load the harness configuration
    ///
    /// A missing file is not an error: the purge then runs with empty lists.
    pub fn load(path: &Path) -> Result<Self, PortalError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No testbench configuration found");
            return Ok(Self::default());
        }
        super::read_yaml(path)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, PortalError> {
        super::parse_yaml(content)
    }
}
