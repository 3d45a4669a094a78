//! JSON fixtures for the `state` command
//!
//! A fixture bundles everything the assembler needs from outside the crate:
//! the billable record, the signed-in viewer and the provider's data.
//!
//! ```json
//! {
//!   "billable": { "id": 1, "name": "Taylor", "stripe_id": "cus_1" },
//!   "viewer": { "name": "Taylor" },
//!   "provider": { "prices": [], "balances": { "cus_1": -500 } }
//! }
//! ```

use crate::io::fixture_provider::{ProviderData, StaticProvider};
use crate::types::{Billable, PortalError, Viewer};
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PortalFixture {
    pub billable: Billable,
    #[serde(default)]
    pub viewer: Viewer,
    #[serde(default)]
    pub provider: ProviderData,
}

impl PortalFixture {
    /// Load a fixture from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `Serialization`
    /// if it is not a valid fixture.
    pub fn load(path: &Path) -> Result<Self, PortalError> {
        let content = std::fs::read_to_string(path).map_err(|e| PortalError::IoError {
            message: format!("Failed to read fixture '{}': {}", path.display(), e),
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Split the fixture into its billable, viewer and a provider serving its data
    pub fn into_parts(self) -> (Billable, Viewer, StaticProvider) {
        (
            self.billable,
            self.viewer,
            StaticProvider::new(self.provider),
        )
    }
}

/// Write a payload as pretty JSON followed by a newline
pub fn write_json(value: &Value, output: &mut dyn Write) -> Result<(), PortalError> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
