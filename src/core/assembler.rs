//! Billing portal state assembly
//!
//! `FrontendStateAssembler` gathers everything the billing dashboard renders
//! for one billable: branding, plans, subscription state, payment methods,
//! invoices and balance.
//!
//! # Prop kinds
//!
//! - Eager props are always computed.
//! - Lazy props (`balance`, `invoices`) are fetched only when a partial
//!   reload names them.
//! - Deferred props (`collectionMethod`, `lastPayment`, `nextPayment`,
//!   `paymentMethods`) are fetched on full visits, and on partial reloads
//!   that name them.
//!
//! Provider requests for lazy and deferred props are issued concurrently.

use crate::config::portal::DEFAULT_BRAND_COLOR;
use crate::config::PortalConfig;
use crate::core::countries::COUNTRIES;
use crate::core::format::{format_amount, format_balance, DateFormat};
use crate::core::invoices::{open_invoices, paid_invoices, InvoiceContext};
use crate::core::payment_methods::payment_methods;
use crate::core::plans::{offered, plan_catalog};
use crate::core::traits::{PaymentsProvider, RouteResolver};
use crate::types::{
    Balance, Billable, FrontendState, Interval, InvoiceLists, PaymentSummary, PortalError,
    PortalRequest, Subscription, SubscriptionState, Viewer, DEFAULT_SUBSCRIPTION,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

/// Provider API version the frontend payment elements are pinned to
pub const STRIPE_VERSION: &str = "2023-10-16";

/// Brand colour class used for `#rrggbb` colours
pub const CUSTOM_HEX_COLOR: &str = "bg-custom-hex";

/// Route names looked up when no URL is configured
pub const DASHBOARD_ROUTE: &str = "dashboard";
pub const TERMS_ROUTE: &str = "terms.show";

/// Assembles the billing dashboard payload
///
/// Cloning is cheap; configuration and collaborators are shared.
#[derive(Clone)]
pub struct FrontendStateAssembler {
    config: Arc<PortalConfig>,
    provider: Arc<dyn PaymentsProvider>,
    routes: Arc<dyn RouteResolver>,
    /// Fixed reference time; `None` means the wall clock
    now: Option<DateTime<Utc>>,
}

impl FrontendStateAssembler {
    pub fn new(
        config: Arc<PortalConfig>,
        provider: Arc<dyn PaymentsProvider>,
        routes: Arc<dyn RouteResolver>,
    ) -> Self {
        Self {
            config,
            provider,
            routes,
            now: None,
        }
    }

    /// Evaluate trials and grace periods against a fixed time
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Build the dashboard payload for a billable
    ///
    /// # Arguments
    ///
    /// * `billable_type` - Configured billable type (`user`, `team`, ...)
    /// * `billable` - The billable whose billing is shown
    /// * `request` - Query parameters, path and prop selection of the request
    /// * `viewer` - The authenticated user
    ///
    /// # Errors
    ///
    /// * `UnknownBillableType` - The type is not configured
    /// * `MissingPrice` - A configured plan has no provider price
    /// * `Provider` - Any provider request failed
    pub async fn current(
        &self,
        billable_type: &str,
        billable: &Billable,
        request: &PortalRequest,
        viewer: &Viewer,
    ) -> Result<FrontendState, PortalError> {
        let now = self.now();
        let billable_config = self.config.billable(billable_type)?;
        let date_format = DateFormat::new(&self.config.spark.date_format)?;

        tracing::debug!(
            billable_type,
            billable_id = %billable.id,
            "Assembling billing portal state"
        );

        let subscription = billable
            .subscription(DEFAULT_SUBSCRIPTION)
            .filter(|subscription| !subscription.incomplete());

        let plans = plan_catalog(self.provider.as_ref(), billable_config).await?;

        let plan = subscription
            .filter(|subscription| subscription.active(now) || subscription.past_due())
            .and_then(|subscription| {
                plans
                    .iter()
                    .find(|plan| subscription.stripe_price.as_deref() == Some(plan.id.as_str()))
                    .cloned()
            });

        let customer_id = if billable.has_stripe_id() {
            billable.stripe_id.as_deref()
        } else {
            None
        };
        let billable_id = billable.id.to_string();
        let invoice_context = InvoiceContext {
            billable_type,
            billable_id: &billable_id,
            routes: self.routes.as_ref(),
            date_format: &date_format,
        };
        let selection = &request.selection;

        let (balance, invoices, collection_method, last_payment, next_payment, methods) = futures::try_join!(
            when(
                selection.includes_lazy("balance"),
                self.balance(billable, customer_id)
            ),
            when(
                selection.includes_lazy("invoices"),
                self.invoices(customer_id, request, &invoice_context)
            ),
            when(
                selection.includes("collectionMethod"),
                self.collection_method(subscription)
            ),
            when(
                selection.includes("lastPayment"),
                self.last_payment(subscription, &date_format)
            ),
            when(
                selection.includes("nextPayment"),
                self.next_payment(customer_id, subscription, &date_format)
            ),
            when(
                selection.includes("paymentMethods"),
                payment_methods(self.provider.as_ref(), customer_id)
            ),
        )?;

        Ok(FrontendState {
            app_logo: self.logo().await?,
            app_name: self.config.app.name.clone(),
            balance,
            invoices,
            billable: billable.to_array()?,
            billable_id,
            billable_name: billable.name.clone(),
            billable_type: billable_type.to_string(),
            billing_address_required: self.config.spark.features.billing_address_required(),
            brand_color: self.brand_color(),
            pm_type: billable.pm_type.clone(),
            pm_expiration_date: billable.pm_expiration.clone(),
            pm_last_four: billable.pm_last_four.clone(),
            cashier_path: self.config.cashier.path.clone(),
            collection_method: collection_method.flatten(),
            collects_vat: self.config.spark.features.collects_eu_vat(),
            collects_billing_address: self.config.spark.features.collects_billing_address(),
            countries: COUNTRIES,
            dashboard_url: self.dashboard_url()?,
            default_interval: billable_config.default_interval,
            generic_trial_ends_at: billable
                .trial_ends_at
                .filter(|_| billable.on_generic_trial(now))
                .map(|ends_at| date_format.format(&ends_at)),
            last_payment: last_payment.flatten(),
            message: request.param("message").unwrap_or_default().to_string(),
            monthly_plans: offered(&plans, Interval::Monthly),
            next_payment: next_payment.flatten(),
            payment_method: billable
                .pm_last_four
                .as_deref()
                .filter(|last_four| !last_four.is_empty())
                .map(|_| "card".to_string()),
            payment_methods: methods.unwrap_or_default(),
            seat_name: billable_config.seat_name.clone(),
            sends_invoices_to_custom_addresses: self
                .config
                .spark
                .features
                .sends_invoices_to_custom_addresses(),
            spark_path: self.config.spark.path.clone(),
            state: SubscriptionState::derive(subscription, request.param("checkout"), now),
            stripe_key: self.config.cashier.key.clone(),
            stripe_version: STRIPE_VERSION.to_string(),
            terms_url: self.terms_url()?,
            trial_ends_at: subscription
                .filter(|subscription| subscription.on_trial(now))
                .and_then(|subscription| subscription.trial_ends_at)
                .map(|ends_at| date_format.format(&ends_at)),
            user_avatar: viewer.profile_photo_url.clone(),
            user_name: viewer.name.clone(),
            yearly_plans: offered(&plans, Interval::Yearly),
            plan,
        })
    }

    /// Build the payload and serialize the keys the request selected
    pub async fn props(
        &self,
        billable_type: &str,
        billable: &Billable,
        request: &PortalRequest,
        viewer: &Viewer,
    ) -> Result<Map<String, Value>, PortalError> {
        self.current(billable_type, billable, request, viewer)
            .await?
            .into_props(&request.selection)
    }

    async fn balance(
        &self,
        billable: &Billable,
        customer_id: Option<&str>,
    ) -> Result<Balance, PortalError> {
        let raw = match customer_id {
            Some(customer_id) => self.provider.customer_balance(customer_id).await?,
            None => 0,
        };
        let currency = billable.preferred_currency(&self.config.cashier.currency);

        Ok(Balance {
            formatted: format_balance(raw, currency),
            raw,
        })
    }

    async fn invoices(
        &self,
        customer_id: Option<&str>,
        request: &PortalRequest,
        context: &InvoiceContext<'_>,
    ) -> Result<InvoiceLists, PortalError> {
        let provider = self.provider.as_ref();
        let (open, paid) = futures::try_join!(
            open_invoices(provider, customer_id, context),
            paid_invoices(provider, customer_id, request, context),
        )?;
        Ok(InvoiceLists { open, paid })
    }

    async fn collection_method(
        &self,
        subscription: Option<&Subscription>,
    ) -> Result<Option<String>, PortalError> {
        let Some(subscription) = subscription else {
            return Ok(None);
        };
        let remote = self
            .provider
            .retrieve_subscription(&subscription.stripe_id)
            .await?;
        Ok(remote.collection_method)
    }

    async fn last_payment(
        &self,
        subscription: Option<&Subscription>,
        date_format: &DateFormat,
    ) -> Result<Option<PaymentSummary>, PortalError> {
        let Some(subscription) = subscription else {
            return Ok(None);
        };
        let invoice = self.provider.latest_invoice(&subscription.stripe_id).await?;

        Ok(invoice.map(|invoice| PaymentSummary {
            amount: format_amount(invoice.raw_real_total(), &invoice.currency),
            date: date_format.format(&invoice.created),
        }))
    }

    async fn next_payment(
        &self,
        customer_id: Option<&str>,
        subscription: Option<&Subscription>,
        date_format: &DateFormat,
    ) -> Result<Option<PaymentSummary>, PortalError> {
        let (Some(customer_id), Some(subscription)) = (customer_id, subscription) else {
            return Ok(None);
        };
        let invoice = self
            .provider
            .upcoming_invoice(customer_id, &subscription.stripe_id)
            .await?;

        Ok(invoice.map(|invoice| PaymentSummary {
            amount: format_amount(invoice.amount_due, &invoice.currency),
            date: date_format.format(&invoice.created),
        }))
    }

    /// Inline the logo file when the configured value names one
    async fn logo(&self) -> Result<Option<String>, PortalError> {
        let Some(logo) = self.config.spark.brand.logo.as_deref() else {
            return Ok(None);
        };

        if logo.is_empty() || !Path::new(logo).is_file() {
            return Ok(Some(logo.to_string()));
        }

        tokio::fs::read_to_string(logo)
            .await
            .map(Some)
            .map_err(|e| PortalError::IoError {
                message: format!("Failed to read logo '{}': {}", logo, e),
            })
    }

    fn brand_color(&self) -> String {
        let color = self
            .config
            .spark
            .brand
            .color
            .as_deref()
            .unwrap_or(DEFAULT_BRAND_COLOR);

        if color.starts_with('#') {
            CUSTOM_HEX_COLOR.to_string()
        } else {
            color.to_string()
        }
    }

    fn dashboard_url(&self) -> Result<String, PortalError> {
        if let Some(url) = configured(&self.config.spark.dashboard_url) {
            return Ok(url.to_string());
        }
        if self.routes.has(DASHBOARD_ROUTE) {
            return self.routes.route(DASHBOARD_ROUTE, &[]);
        }
        Ok("/".to_string())
    }

    fn terms_url(&self) -> Result<Option<String>, PortalError> {
        if let Some(url) = configured(&self.config.spark.terms_url) {
            return Ok(Some(url.to_string()));
        }
        if self.routes.has(TERMS_ROUTE) {
            return self.routes.route(TERMS_ROUTE, &[]).map(Some);
        }
        Ok(None)
    }
}

fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Run `fetch` only when the prop is wanted
async fn when<T, F>(wanted: bool, fetch: F) -> Result<Option<T>, PortalError>
where
    F: Future<Output = Result<T, PortalError>>,
{
    if wanted {
        fetch.await.map(Some)
    } else {
        Ok(None)
    }
}
