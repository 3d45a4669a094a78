//! Plan and price types for the billing portal
//!
//! Plans are configured per billable type; prices come from the payments
//! provider. A plan is shown only after its price has been looked up.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Billing interval of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Monthly,
    Yearly,
}

/// A price as returned by the payments provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub id: String,

    /// Amount in the currency's minor unit; absent for tiered or metered prices
    #[serde(default)]
    pub unit_amount: Option<i64>,

    pub currency: String,

    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// Parameters for listing provider prices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceListParams {
    pub limit: usize,
    pub starting_after: Option<String>,
}

/// One page of a provider price listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceList {
    pub data: Vec<Price>,
    pub has_more: bool,
}

/// A subscription plan offered in the portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Provider price identifier
    pub id: String,

    pub name: String,

    pub short_description: Option<String>,

    pub interval: Interval,

    pub features: Vec<String>,

    pub options: Map<String, Value>,

    /// Archived plans are kept for existing subscribers but not offered
    pub active: bool,

    pub trial_days: Option<u32>,

    /// Amount in minor units, filled in from the provider price
    pub raw_price: Option<i64>,

    /// Display price with trailing zero cents removed
    pub price: Option<String>,

    pub currency: Option<String>,
}
