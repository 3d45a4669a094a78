//! Core business logic module
//!
//! This module contains the billing portal components:
//! - `traits` - Seams for the payments provider and the application router
//! - `assembler` - Builds the billing dashboard payload
//! - `plans` - Plan catalog priced from the provider
//! - `invoices` - Open invoices and cursor-paginated paid invoices
//! - `payment_methods` - Saved cards
//! - `format` - Money, date and card formatting
//! - `countries` - ISO 3166-1 country table

pub mod assembler;
pub mod countries;
pub mod format;
pub mod invoices;
pub mod payment_methods;
pub mod plans;
pub mod traits;

pub use assembler::{FrontendStateAssembler, STRIPE_VERSION};
pub use countries::COUNTRIES;
pub use invoices::Cursor;
pub use traits::{PaymentsProvider, RouteResolver};
