//! Request context for payload assembly
//!
//! The portal payload depends on a few request details: query parameters
//! (`checkout`, `message`, `cursor`), the current path used for pagination
//! links, and whether the client asked for a partial reload of specific keys.

use std::collections::BTreeSet;

/// Which payload keys a request wants resolved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropSelection {
    /// A full page visit: every eager and deferred key, no lazy keys
    #[default]
    Full,

    /// A partial reload: only the named keys, lazy ones included
    Partial(BTreeSet<String>),
}

impl PropSelection {
    /// Build a partial selection from key names
    pub fn partial<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PropSelection::Partial(keys.into_iter().map(Into::into).collect())
    }

    /// Whether an always-available or deferred key should be resolved
    pub fn includes(&self, key: &str) -> bool {
        match self {
            PropSelection::Full => true,
            PropSelection::Partial(keys) => keys.contains(key),
        }
    }

    /// Whether a lazy key should be resolved
    ///
    /// Lazy keys are never part of a full visit.
    pub fn includes_lazy(&self, key: &str) -> bool {
        match self {
            PropSelection::Full => false,
            PropSelection::Partial(keys) => keys.contains(key),
        }
    }
}

/// The incoming request the payload is built for
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortalRequest {
    /// Request path without the query string, used for pagination links
    pub path: String,

    /// Query parameters in their original order
    pub query: Vec<(String, String)>,

    pub selection: PropSelection,
}

impl PortalRequest {
    pub fn new(path: impl Into<String>) -> Self {
        PortalRequest {
            path: path.into(),
            query: Vec::new(),
            selection: PropSelection::Full,
        }
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Restrict the request to a partial reload of the given keys
    pub fn with_selection(mut self, selection: PropSelection) -> Self {
        self.selection = selection;
        self
    }

    /// First value of a query parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Query parameters except the named one
    pub fn query_except(&self, name: &str) -> Vec<(String, String)> {
        self.query
            .iter()
            .filter(|(key, _)| key != name)
            .cloned()
            .collect()
    }
}
