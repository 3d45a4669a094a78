//! Payment-method types for the billing portal

use serde::{Deserialize, Serialize};

/// Card details of a payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub brand: String,
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: i32,
    #[serde(default)]
    pub country: Option<String>,
}

/// A payment method attached to a provider customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,

    #[serde(rename = "type", default = "default_payment_method_type")]
    pub kind: String,

    /// Present for card payment methods only
    #[serde(default)]
    pub card: Option<Card>,
}

fn default_payment_method_type() -> String {
    "card".to_string()
}

/// A payment method as rendered in the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodSummary {
    pub id: String,
    pub last4: String,
    pub brand: String,
    /// `Mon YYYY`
    pub expiration: String,
    pub country: Option<String>,
    pub default: bool,
}
