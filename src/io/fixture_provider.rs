//! In-memory payments provider
//!
//! `StaticProvider` answers every `PaymentsProvider` request from data held in
//! memory, usually loaded from a JSON fixture. It follows the provider's list
//! semantics (newest first, `limit`, `starting_after` / `ending_before`,
//! `has_more`), which makes it suitable for the CLI and for tests.

use crate::core::traits::PaymentsProvider;
use crate::types::{
    Invoice, InvoiceList, InvoiceListParams, PaymentMethod, PortalError, Price, PriceList,
    PriceListParams, ProviderSubscription,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider data keyed by customer or subscription id
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderData {
    pub prices: Vec<Price>,
    /// Customer id → balance in minor units
    pub balances: HashMap<String, i64>,
    /// Customer id → payment methods
    pub payment_methods: HashMap<String, Vec<PaymentMethod>>,
    /// Customer id → default payment method id
    pub default_payment_methods: HashMap<String, String>,
    /// Customer id → invoices (any order)
    pub invoices: HashMap<String, Vec<Invoice>>,
    /// Subscription id → live subscription
    pub subscriptions: HashMap<String, ProviderSubscription>,
    /// Subscription id → latest invoice
    pub latest_invoices: HashMap<String, Invoice>,
    /// Subscription id → upcoming invoice
    pub upcoming_invoices: HashMap<String, Invoice>,
}

/// A payments provider backed by in-memory data
#[derive(Debug, Default)]
pub struct StaticProvider {
    data: ProviderData,
    price_requests: AtomicUsize,
    requests: AtomicUsize,
}

impl StaticProvider {
    pub fn new(data: ProviderData) -> Self {
        StaticProvider {
            data,
            price_requests: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_prices(mut self, prices: Vec<Price>) -> Self {
        self.data.prices = prices;
        self
    }

    pub fn with_balance(mut self, customer_id: &str, balance: i64) -> Self {
        self.data.balances.insert(customer_id.to_string(), balance);
        self
    }

    pub fn with_payment_methods(
        mut self,
        customer_id: &str,
        methods: Vec<PaymentMethod>,
        default: Option<&str>,
    ) -> Self {
        self.data
            .payment_methods
            .insert(customer_id.to_string(), methods);
        if let Some(default) = default {
            self.data
                .default_payment_methods
                .insert(customer_id.to_string(), default.to_string());
        }
        self
    }

    pub fn with_invoices(mut self, customer_id: &str, invoices: Vec<Invoice>) -> Self {
        self.data.invoices.insert(customer_id.to_string(), invoices);
        self
    }

    pub fn with_subscription(mut self, subscription: ProviderSubscription) -> Self {
        self.data
            .subscriptions
            .insert(subscription.id.clone(), subscription);
        self
    }

    pub fn with_latest_invoice(mut self, subscription_id: &str, invoice: Invoice) -> Self {
        self.data
            .latest_invoices
            .insert(subscription_id.to_string(), invoice);
        self
    }

    pub fn with_upcoming_invoice(mut self, subscription_id: &str, invoice: Invoice) -> Self {
        self.data
            .upcoming_invoices
            .insert(subscription_id.to_string(), invoice);
        self
    }

    /// Number of price listing requests served
    pub fn price_requests(&self) -> usize {
        self.price_requests.load(Ordering::Relaxed)
    }

    /// Number of requests of any kind served
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn record(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

/// Slice one page out of a newest-first list
///
/// Returns the page and whether more items exist beyond it in the
/// direction of travel.
fn page<T: Clone>(
    items: &[T],
    limit: usize,
    position: impl Fn(&T) -> bool,
    starting_after: bool,
    cursor: Option<&str>,
    kind: &str,
) -> Result<(Vec<T>, bool), PortalError> {
    let Some(cursor) = cursor else {
        let end = limit.min(items.len());
        return Ok((items[..end].to_vec(), items.len() > end));
    };

    let index = items
        .iter()
        .position(position)
        .ok_or_else(|| PortalError::provider("list", format!("No such {}: '{}'", kind, cursor)))?;

    if starting_after {
        let rest = &items[index + 1..];
        let end = limit.min(rest.len());
        Ok((rest[..end].to_vec(), rest.len() > end))
    } else {
        let start = index.saturating_sub(limit);
        Ok((items[start..index].to_vec(), start > 0))
    }
}

#[async_trait]
impl PaymentsProvider for StaticProvider {
    async fn list_prices(&self, params: &PriceListParams) -> Result<PriceList, PortalError> {
        self.record();
        self.price_requests.fetch_add(1, Ordering::Relaxed);

        let cursor = params.starting_after.as_deref();
        let (data, has_more) = page(
            &self.data.prices,
            params.limit,
            |price| Some(price.id.as_str()) == cursor,
            true,
            cursor,
            "price",
        )?;
        Ok(PriceList { data, has_more })
    }

    async fn customer_balance(&self, customer_id: &str) -> Result<i64, PortalError> {
        self.record();
        Ok(self.data.balances.get(customer_id).copied().unwrap_or(0))
    }

    async fn list_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PortalError> {
        self.record();
        Ok(self
            .data
            .payment_methods
            .get(customer_id)
            .map(|methods| {
                methods
                    .iter()
                    .filter(|method| method.kind == "card")
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn default_payment_method(
        &self,
        customer_id: &str,
    ) -> Result<Option<String>, PortalError> {
        self.record();
        Ok(self.data.default_payment_methods.get(customer_id).cloned())
    }

    async fn list_invoices(
        &self,
        customer_id: &str,
        params: &InvoiceListParams,
    ) -> Result<InvoiceList, PortalError> {
        self.record();

        let mut invoices: Vec<Invoice> = self
            .data
            .invoices
            .get(customer_id)
            .map(|invoices| {
                invoices
                    .iter()
                    .filter(|invoice| {
                        params
                            .status
                            .map_or(true, |status| invoice.status == status.as_str())
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        invoices.sort_by(|a, b| b.created.cmp(&a.created));

        let (starting_after, cursor) = match (&params.starting_after, &params.ending_before) {
            (Some(after), _) => (true, Some(after.as_str())),
            (None, Some(before)) => (false, Some(before.as_str())),
            (None, None) => (true, None),
        };

        let (mut data, has_more) = page(
            &invoices,
            params.limit,
            |invoice| Some(invoice.id.as_str()) == cursor,
            starting_after,
            cursor,
            "invoice",
        )?;

        if !params.expand_subscription {
            for invoice in &mut data {
                invoice.subscription = None;
            }
        }

        Ok(InvoiceList { data, has_more })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PortalError> {
        self.record();
        self.data
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| {
                PortalError::provider(
                    "retrieve_subscription",
                    format!("No such subscription: '{}'", subscription_id),
                )
            })
    }

    async fn latest_invoice(&self, subscription_id: &str) -> Result<Option<Invoice>, PortalError> {
        self.record();
        Ok(self.data.latest_invoices.get(subscription_id).cloned())
    }

    async fn upcoming_invoice(
        &self,
        _customer_id: &str,
        subscription_id: &str,
    ) -> Result<Option<Invoice>, PortalError> {
        self.record();
        Ok(self.data.upcoming_invoices.get(subscription_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn invoice(id: &str, status: &str, days_ago: i64) -> Invoice {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        Invoice {
            id: id.to_string(),
            status: status.to_string(),
            paid: status == "paid",
            total: 1000,
            starting_balance: 0,
            amount_due: 1000,
            currency: "usd".to_string(),
            created: base - Duration::days(days_ago),
            subscription: None,
        }
    }

    fn provider() -> StaticProvider {
        let invoices = (1..=5)
            .map(|i| invoice(&format!("in_{}", i), "paid", i))
            .chain(std::iter::once(invoice("in_open", "open", 0)))
            .collect();
        StaticProvider::default().with_invoices("cus_1", invoices)
    }

    fn params(limit: usize) -> InvoiceListParams {
        InvoiceListParams {
            status: Some(InvoiceStatus::Paid),
            limit,
            ..InvoiceListParams::default()
        }
    }

    fn ids(list: &InvoiceList) -> Vec<&str> {
        list.data.iter().map(|invoice| invoice.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_first_page_is_newest_first() {
        let list = provider().list_invoices("cus_1", &params(2)).await.unwrap();
        assert_eq!(ids(&list), vec!["in_1", "in_2"]);
        assert!(list.has_more);
    }

    #[tokio::test]
    async fn test_starting_after() {
        let mut params = params(2);
        params.starting_after = Some("in_2".to_string());
        let list = provider().list_invoices("cus_1", &params).await.unwrap();
        assert_eq!(ids(&list), vec!["in_3", "in_4"]);
        assert!(list.has_more);
    }

    #[tokio::test]
    async fn test_ending_before() {
        let mut params = params(2);
        params.ending_before = Some("in_4".to_string());
        let list = provider().list_invoices("cus_1", &params).await.unwrap();
        assert_eq!(ids(&list), vec!["in_2", "in_3"]);
        assert!(list.has_more);

        params.ending_before = Some("in_2".to_string());
        let list = provider().list_invoices("cus_1", &params).await.unwrap();
        assert_eq!(ids(&list), vec!["in_1"]);
        assert!(!list.has_more);
    }

    #[tokio::test]
    async fn test_unknown_cursor_is_provider_error() {
        let mut params = params(2);
        params.starting_after = Some("in_missing".to_string());
        let err = provider().list_invoices("cus_1", &params).await.unwrap_err();
        assert!(matches!(err, PortalError::Provider { .. }));
    }

    #[tokio::test]
    async fn test_unknown_customer_has_no_data() {
        let provider = provider();
        assert!(provider
            .list_invoices("cus_other", &params(10))
            .await
            .unwrap()
            .data
            .is_empty());
        assert_eq!(provider.customer_balance("cus_other").await.unwrap(), 0);
        assert_eq!(provider.requests(), 2);
    }
}
