//! Named routes from configuration
//!
//! Route templates use `{name}` placeholders, filled positionally:
//! `/billing/{type}/{id}/invoice/{invoice}` with `["user", "1", "in_1"]`
//! becomes `/billing/user/1/invoice/in_1`.

use crate::core::traits::RouteResolver;
use crate::types::PortalError;
use std::collections::BTreeMap;
use url::form_urlencoded;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticRoutes {
    routes: BTreeMap<String, String>,
}

impl StaticRoutes {
    pub fn new(routes: BTreeMap<String, String>) -> Self {
        StaticRoutes { routes }
    }

    /// Register a route template
    pub fn with_route(mut self, name: &str, template: &str) -> Self {
        self.routes.insert(name.to_string(), template.to_string());
        self
    }
}

impl RouteResolver for StaticRoutes {
    fn has(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    fn route(&self, name: &str, params: &[&str]) -> Result<String, PortalError> {
        let template = self
            .routes
            .get(name)
            .ok_or_else(|| PortalError::route_not_defined(name))?;

        let mut url = String::with_capacity(template.len());
        let mut params = params.iter();
        let mut rest = template.as_str();

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            url.push_str(&rest[..open]);

            let placeholder = &rest[open + 1..open + close];
            let value = params.next().ok_or_else(|| {
                PortalError::config(
                    None,
                    format!(
                        "Missing required parameter '{}' for route [{}]",
                        placeholder, name
                    ),
                )
            })?;
            url.extend(form_urlencoded::byte_serialize(value.as_bytes()));

            rest = &rest[open + close + 1..];
        }
        url.push_str(rest);

        Ok(url)
    }
}
