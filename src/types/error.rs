//! Error types for the billing portal
//!
//! This module defines all error types that can occur while assembling the
//! billing-portal payload or purging a skeleton directory.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Catalog Errors**: configured plans without a provider price, unknown billable types
//! - **Provider Errors**: failures reported by the payments provider
//! - **Configuration Errors**: unreadable or malformed YAML/JSON input
//! - **File I/O Errors**: permission denied, unreadable paths, etc.
//! - **Pattern Errors**: invalid glob patterns in purge lists

use thiserror::Error;

/// Main error type for the billing portal
///
/// Each variant includes relevant context to help diagnose and resolve the issue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortalError {
    /// A configured plan references a price the provider does not know about
    ///
    /// This is fatal for payload assembly: the plan catalog cannot be priced.
    #[error("Price [{price_id}] does not exist in your Stripe account.")]
    MissingPrice {
        /// The configured price identifier
        price_id: String,
    },

    /// The requested billable type has no configuration
    #[error("Billable type '{billable_type}' is not configured")]
    UnknownBillableType {
        /// The billable type that was requested
        billable_type: String,
    },

    /// The payments provider rejected or failed a request
    #[error("Payments provider error during {operation}: {message}")]
    Provider {
        /// Provider operation that failed
        operation: String,
        /// Description of the failure
        message: String,
    },

    /// A required named route is not registered
    #[error("Route [{name}] not defined")]
    RouteNotDefined {
        /// The route name
        name: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error{}: {message}", path.as_ref().map(|p| format!(" in {}", p)).unwrap_or_default())]
    Config {
        /// Path of the configuration file (if available)
        path: Option<String>,
        /// Description of the problem
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Serialization or deserialization of a payload failed
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error
        message: String,
    },

    /// A purge glob pattern could not be compiled
    #[error("Invalid path pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Description of the pattern error
        message: String,
    },
}

// Conversion from io::Error to PortalError
impl From<std::io::Error> for PortalError {
    fn from(error: std::io::Error) -> Self {
        PortalError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from serde_json::Error to PortalError
impl From<serde_json::Error> for PortalError {
    fn from(error: serde_json::Error) -> Self {
        PortalError::Serialization {
            message: error.to_string(),
        }
    }
}

// Conversion from serde_yaml::Error to PortalError
impl From<serde_yaml::Error> for PortalError {
    fn from(error: serde_yaml::Error) -> Self {
        PortalError::Config {
            path: None,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl PortalError {
    /// Create a MissingPrice error
    pub fn missing_price(price_id: &str) -> Self {
        PortalError::MissingPrice {
            price_id: price_id.to_string(),
        }
    }

    /// Create an UnknownBillableType error
    pub fn unknown_billable_type(billable_type: &str) -> Self {
        PortalError::UnknownBillableType {
            billable_type: billable_type.to_string(),
        }
    }

    /// Create a Provider error
    pub fn provider(operation: &str, message: impl Into<String>) -> Self {
        PortalError::Provider {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Create a RouteNotDefined error
    pub fn route_not_defined(name: &str) -> Self {
        PortalError::RouteNotDefined {
            name: name.to_string(),
        }
    }

    /// Create a Config error tied to a file
    pub fn config(path: Option<&str>, message: impl Into<String>) -> Self {
        PortalError::Config {
            path: path.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create a Pattern error
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        PortalError::Pattern {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::missing_price(
        PortalError::MissingPrice { price_id: "price_123".to_string() },
        "Price [price_123] does not exist in your Stripe account."
    )]
    #[case::unknown_billable_type(
        PortalError::UnknownBillableType { billable_type: "team".to_string() },
        "Billable type 'team' is not configured"
    )]
    #[case::provider(
        PortalError::Provider { operation: "list_prices".to_string(), message: "timeout".to_string() },
        "Payments provider error during list_prices: timeout"
    )]
    #[case::route_not_defined(
        PortalError::RouteNotDefined { name: "spark.invoices.download".to_string() },
        "Route [spark.invoices.download] not defined"
    )]
    #[case::config_with_path(
        PortalError::Config { path: Some("portal.yaml".to_string()), message: "bad key".to_string() },
        "Configuration error in portal.yaml: bad key"
    )]
    #[case::config_without_path(
        PortalError::Config { path: None, message: "bad key".to_string() },
        "Configuration error: bad key"
    )]
    #[case::io_error(
        PortalError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::pattern(
        PortalError::Pattern { pattern: "a/[".to_string(), message: "invalid range pattern".to_string() },
        "Invalid path pattern 'a/[': invalid range pattern"
    )]
    fn test_error_display(#[case] error: PortalError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::missing_price(
        PortalError::missing_price("price_1"),
        PortalError::MissingPrice { price_id: "price_1".to_string() }
    )]
    #[case::provider(
        PortalError::provider("balance", "down"),
        PortalError::Provider { operation: "balance".to_string(), message: "down".to_string() }
    )]
    #[case::config(
        PortalError::config(Some("testbench.yaml"), "oops"),
        PortalError::Config { path: Some("testbench.yaml".to_string()), message: "oops".to_string() }
    )]
    fn test_helper_functions(#[case] result: PortalError, #[case] expected: PortalError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: PortalError = io_error.into();
        assert!(matches!(error, PortalError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: PortalError = json_error.into();
        assert!(matches!(error, PortalError::Serialization { .. }));
    }
}
