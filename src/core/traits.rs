//! Core traits for the external collaborators of the billing portal
//!
//! The payments provider and the application router are not part of this
//! crate. These traits describe exactly what the assembler needs from them,
//! so any SDK client or router can be plugged in.

use crate::types::{
    Invoice, InvoiceList, InvoiceListParams, PaymentMethod, PortalError, PriceList,
    PriceListParams, ProviderSubscription,
};
use async_trait::async_trait;

/// Trait for reading billing data from the payments provider
///
/// Every method is a single provider request. Callers only invoke the
/// customer-scoped methods for billables that have a customer id.
#[async_trait]
pub trait PaymentsProvider: Send + Sync {
    /// List one page of prices
    async fn list_prices(&self, params: &PriceListParams) -> Result<PriceList, PortalError>;

    /// Current customer balance in minor units (negative means credit)
    async fn customer_balance(&self, customer_id: &str) -> Result<i64, PortalError>;

    /// Card payment methods attached to the customer
    async fn list_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<Vec<PaymentMethod>, PortalError>;

    /// Id of the customer's default payment method, if any
    async fn default_payment_method(
        &self,
        customer_id: &str,
    ) -> Result<Option<String>, PortalError>;

    /// List one page of the customer's invoices, newest first
    async fn list_invoices(
        &self,
        customer_id: &str,
        params: &InvoiceListParams,
    ) -> Result<InvoiceList, PortalError>;

    /// Retrieve a subscription as the provider currently sees it
    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PortalError>;

    /// The most recent invoice issued for a subscription
    async fn latest_invoice(&self, subscription_id: &str) -> Result<Option<Invoice>, PortalError>;

    /// The next invoice the provider will issue for a subscription
    async fn upcoming_invoice(
        &self,
        customer_id: &str,
        subscription_id: &str,
    ) -> Result<Option<Invoice>, PortalError>;
}

/// Trait for resolving named application routes into URLs
pub trait RouteResolver: Send + Sync {
    /// Whether a route with this name is registered
    fn has(&self, name: &str) -> bool;

    /// URL of a named route with positional parameters filled in
    ///
    /// # Errors
    ///
    /// Returns `RouteNotDefined` if no route has this name.
    fn route(&self, name: &str, params: &[&str]) -> Result<String, PortalError>;
}
