//! I/O module
//!
//! Adapters between the outside world and the core traits.
//!
//! # Components
//!
//! - `fixture_provider` - In-memory `PaymentsProvider` with provider list semantics
//! - `fixture` - JSON fixtures for the `state` command and JSON output
//! - `routes` - `RouteResolver` over configured route templates

pub mod fixture;
pub mod fixture_provider;
pub mod routes;

pub use fixture::{write_json, PortalFixture};
pub use fixture_provider::{ProviderData, StaticProvider};
pub use routes::StaticRoutes;
