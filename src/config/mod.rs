//! Configuration module
//!
//! Two independent configuration files are understood:
//! - `portal` - the billing portal configuration (app name, branding, features,
//!   plans per billable type, named routes)
//! - `testbench` - the package-testing harness file, of which only the purge
//!   lists are read
//!
//! Both are YAML. Every key has a default, so an empty file is valid.

pub mod portal;
pub mod testbench;

pub use portal::{
    AppConfig, BillableConfig, BillingAddressCollection, BrandConfig, CashierConfig,
    EuVatCollection, Features, InvoiceEmails, PlanConfig, PortalConfig, SparkConfig,
};
pub use testbench::{PurgeAttributes, TestbenchConfig};

use crate::types::PortalError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and parse a YAML file
///
/// An empty (or whitespace-only) file yields the type's default value.
pub(crate) fn read_yaml<T>(path: &Path) -> Result<T, PortalError>
where
    T: DeserializeOwned + Default,
{
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|e| PortalError::config(Some(&display), e.to_string()))?;

    parse_yaml(&content).map_err(|e| match e {
        PortalError::Config { message, .. } => PortalError::config(Some(&display), message),
        other => other,
    })
}

/// Parse YAML text, treating an empty document as the default value
pub(crate) fn parse_yaml<T>(content: &str) -> Result<T, PortalError>
where
    T: DeserializeOwned + Default,
{
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_str(content)?)
}
