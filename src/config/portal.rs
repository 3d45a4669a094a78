//! Billing portal configuration
//!
//! Loaded from YAML, with a handful of environment overrides for values that
//! usually differ per deployment (app name, publishable key, paths, currency).

use crate::types::{Interval, PortalError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Default display format for dates (`January 5, 2024`)
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Default brand colour class
pub const DEFAULT_BRAND_COLOR: &str = "bg-gray-800";

/// Root of the portal configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub app: AppConfig,
    pub cashier: CashierConfig,
    pub spark: SparkConfig,
    /// Named route templates, e.g. `dashboard: /dashboard`
    pub routes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Laravel".to_string(),
        }
    }
}

/// Payments provider integration settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CashierConfig {
    /// URI prefix of the provider integration routes
    pub path: String,
    /// Publishable key handed to the frontend
    pub key: Option<String>,
    /// Fallback currency for balances
    pub currency: String,
}

impl Default for CashierConfig {
    fn default() -> Self {
        Self {
            path: "stripe".to_string(),
            key: None,
            currency: "usd".to_string(),
        }
    }
}

/// Billing portal settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    /// URI prefix of the billing portal
    pub path: String,
    pub dashboard_url: Option<String>,
    pub terms_url: Option<String>,
    /// chrono format string used for every displayed date
    pub date_format: String,
    pub brand: BrandConfig,
    pub features: Features,
    pub billables: BTreeMap<String, BillableConfig>,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            path: "billing".to_string(),
            dashboard_url: None,
            terms_url: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            brand: BrandConfig::default(),
            features: Features::default(),
            billables: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// Either a path to an SVG file or a literal logo value
    pub logo: Option<String>,
    /// Tailwind class or `#rrggbb`
    pub color: Option<String>,
}

/// Optional portal features; an absent section means the feature is off
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Features {
    pub billing_address_collection: Option<BillingAddressCollection>,
    pub eu_vat_collection: Option<EuVatCollection>,
    pub invoice_emails: Option<InvoiceEmails>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BillingAddressCollection {
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct EuVatCollection {
    pub home_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceEmails {
    pub custom_addresses: bool,
}

impl Features {
    pub fn collects_billing_address(&self) -> bool {
        self.billing_address_collection.is_some()
    }

    pub fn billing_address_required(&self) -> bool {
        self.billing_address_collection
            .as_ref()
            .is_some_and(|collection| collection.required)
    }

    pub fn collects_eu_vat(&self) -> bool {
        self.eu_vat_collection.is_some()
    }

    pub fn sends_invoices_to_custom_addresses(&self) -> bool {
        self.invoice_emails
            .as_ref()
            .is_some_and(|emails| emails.custom_addresses)
    }
}

/// Settings for one billable type (`user`, `team`, ...)
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BillableConfig {
    pub default_interval: Interval,
    /// Name of the per-seat unit, when billing per seat
    pub seat_name: Option<String>,
    pub trial_days: Option<u32>,
    pub plans: Vec<PlanConfig>,
}

/// A configured plan; yields a monthly and/or a yearly offering
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub name: String,
    pub short_description: Option<String>,
    pub monthly_id: Option<String>,
    pub yearly_id: Option<String>,
    pub features: Vec<String>,
    pub archived: bool,
    pub trial_days: Option<u32>,
    pub options: Map<String, Value>,
}

impl PortalConfig {
    /// Load the configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the file if it cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PortalError> {
        super::read_yaml(path)
    }

    /// Parse the configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, PortalError> {
        super::parse_yaml(content)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Recognised keys: `APP_NAME`, `STRIPE_KEY`, `CASHIER_PATH`, `SPARK_PATH`,
    /// `CASHIER_CURRENCY`. Blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(name) = read("APP_NAME") {
            self.app.name = name;
        }
        if let Some(key) = read("STRIPE_KEY") {
            self.cashier.key = Some(key);
        }
        if let Some(path) = read("CASHIER_PATH") {
            self.cashier.path = path;
        }
        if let Some(path) = read("SPARK_PATH") {
            self.spark.path = path;
        }
        if let Some(currency) = read("CASHIER_CURRENCY") {
            self.cashier.currency = currency.to_ascii_lowercase();
        }
        self
    }

    /// Settings of a billable type
    ///
    /// # Errors
    ///
    /// Returns `UnknownBillableType` if the type is not configured.
    pub fn billable(&self, billable_type: &str) -> Result<&BillableConfig, PortalError> {
        self.spark
            .billables
            .get(billable_type)
            .ok_or_else(|| PortalError::unknown_billable_type(billable_type))
    }
}
