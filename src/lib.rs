//! Billing Portal Library
//! # Overview
//!
//! This library assembles the state a subscription billing dashboard renders
//! for one billable (a user or a team), and restores package-testing skeleton
//! applications to their pristine state.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Billable, Subscription, Invoice, FrontendState, etc.)
//! - [`config`] - Portal and harness configuration (YAML)
//! - [`core`] - Business logic components:
//!   - [`core::assembler`] - Builds the dashboard payload
//!   - [`core::plans`] - Plan catalog priced from the payments provider
//!   - [`core::invoices`] - Open invoices and cursor-paginated paid invoices
//!   - [`core::traits`] - Seams for the payments provider and the router
//! - [`io`] - Fixture-backed provider, configured routes, JSON output
//! - [`purge`] - Skeleton purge
//! - [`command`] - The CLI commands
//! - [`cli`] - CLI arguments parsing
//! - [`telemetry`] - Logging setup
//!
//! # Subscription States
//!
//! - **none**: No usable subscription
//! - **pending**: Checkout finished, subscription not recorded yet
//! - **active**: Subscription grants access
//! - **past_due**: Latest payment failed and is being retried
//! - **onGracePeriod**: Cancelled, paid period not over yet
//!
//! # Prop Kinds
//!
//! - Eager props are part of every payload
//! - Lazy props (`balance`, `invoices`) only appear when a partial reload asks for them
//! - Deferred props (`collectionMethod`, `lastPayment`, `nextPayment`,
//!   `paymentMethods`) are resolved on full visits and on partial reloads naming them

// Module declarations
pub mod cli;
pub mod command;
pub mod config;
pub mod core;
pub mod io;
pub mod purge;
pub mod telemetry;
pub mod types;

pub use config::{PortalConfig, PurgeAttributes, TestbenchConfig};
pub use self::core::{FrontendStateAssembler, PaymentsProvider, RouteResolver};
pub use io::{write_json, PortalFixture, StaticProvider, StaticRoutes};
pub use purge::{purge, PurgeReport, PurgeSkeleton};
pub use types::{
    Billable, BillableId, FrontendState, PortalError, PortalRequest, PropSelection,
    SubscriptionState, Viewer,
};
