//! Invoice-related types for the billing portal
//!
//! Provider-side invoice records, the listing parameters used to query them,
//! and the summaries rendered for the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription details expanded onto an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSubscription {
    pub id: String,
    pub status: String,
}

impl InvoiceSubscription {
    /// Whether open invoices of this subscription should still be shown
    ///
    /// Cancelled and incomplete subscriptions hide their open invoices.
    pub fn shows_open_invoices(&self) -> bool {
        self.status != "canceled" && self.status != "incomplete"
    }
}

/// An invoice as returned by the payments provider
///
/// All amounts are in the currency's minor unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,

    /// `draft`, `open`, `paid`, `uncollectible` or `void`
    pub status: String,

    #[serde(default)]
    pub paid: bool,

    pub total: i64,

    /// Customer balance applied before this invoice (negative means credit)
    #[serde(default)]
    pub starting_balance: i64,

    #[serde(default)]
    pub amount_due: i64,

    pub currency: String,

    pub created: DateTime<Utc>,

    /// Present only when the listing asked for the subscription to be expanded
    #[serde(default)]
    pub subscription: Option<InvoiceSubscription>,
}

impl Invoice {
    /// Total that was paid (or will be paid) once the starting balance is applied
    pub fn raw_real_total(&self) -> i64 {
        self.total + self.starting_balance
    }
}

/// Filter on invoice status for provider listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Open,
    Paid,
    Uncollectible,
    Void,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Open => "open",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Uncollectible => "uncollectible",
            InvoiceStatus::Void => "void",
        }
    }
}

/// Parameters for listing a customer's invoices
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceListParams {
    pub status: Option<InvoiceStatus>,
    pub limit: usize,
    /// Return the page after this invoice id
    pub starting_after: Option<String>,
    /// Return the page before this invoice id
    pub ending_before: Option<String>,
    /// Whether `subscription` should be expanded on each invoice
    pub expand_subscription: bool,
}

impl Default for InvoiceListParams {
    fn default() -> Self {
        Self {
            status: None,
            limit: 24,
            starting_after: None,
            ending_before: None,
            expand_subscription: false,
        }
    }
}

/// One page of a provider invoice listing, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceList {
    pub data: Vec<Invoice>,
    pub has_more: bool,
}

/// An invoice row as rendered in the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub amount: String,
    pub date: String,
    pub id: String,
    pub invoice_url: String,
    pub status: String,
}

/// A one-line payment summary (last or next payment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub amount: String,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::active("active", true)]
    #[case::past_due("past_due", true)]
    #[case::canceled("canceled", false)]
    #[case::incomplete("incomplete", false)]
    fn test_shows_open_invoices(#[case] status: &str, #[case] expected: bool) {
        let sub = InvoiceSubscription {
            id: "sub_1".to_string(),
            status: status.to_string(),
        };
        assert_eq!(sub.shows_open_invoices(), expected);
    }

    #[test]
    fn test_raw_real_total_applies_starting_balance() {
        let invoice: Invoice = serde_json::from_str(
            r#"{"id":"in_1","status":"paid","paid":true,"total":2000,
                "starting_balance":-500,"currency":"usd",
                "created":"2024-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(invoice.raw_real_total(), 1500);
        assert_eq!(invoice.amount_due, 0);
        assert!(invoice.subscription.is_none());
    }
}
