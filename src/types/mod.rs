//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `billable`: Billable entities and the authenticated viewer
//! - `subscription`: Subscription rows, predicates and dashboard state
//! - `plan`: Plans and provider prices
//! - `invoice`: Provider invoices and their dashboard summaries
//! - `payment_method`: Payment methods and their dashboard summaries
//! - `request`: Request context and prop selection
//! - `state`: The assembled dashboard payload
//! - `error`: Error types for the billing portal

pub mod billable;
pub mod error;
pub mod invoice;
pub mod payment_method;
pub mod plan;
pub mod request;
pub mod state;
pub mod subscription;

pub use billable::{Billable, BillableId, Viewer};
pub use error::PortalError;
pub use invoice::{
    Invoice, InvoiceList, InvoiceListParams, InvoiceStatus, InvoiceSubscription, InvoiceSummary,
    PaymentSummary,
};
pub use payment_method::{Card, PaymentMethod, PaymentMethodSummary};
pub use plan::{Interval, Plan, Price, PriceList, PriceListParams};
pub use request::{PortalRequest, PropSelection};
pub use state::{Balance, Countries, CursorPage, FrontendState, InvoiceLists};
pub use subscription::{
    ProviderSubscription, Subscription, SubscriptionState, DEFAULT_SUBSCRIPTION,
};
