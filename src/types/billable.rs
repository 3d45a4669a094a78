//! Billable-related types for the billing portal
//!
//! A billable is the user or team that owns a payments-provider customer.
//! This module also holds the authenticated viewer, who may differ from the
//! billable (a team member looking at a team's billing).

use super::subscription::Subscription;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Primary key of a billable model
///
/// Accepts both integer and string keys; always rendered as a string in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BillableId {
    Int(u64),
    Str(String),
}

impl fmt::Display for BillableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillableId::Int(id) => write!(f, "{}", id),
            BillableId::Str(id) => f.write_str(id),
        }
    }
}

/// An entity associated with a payments-provider customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billable {
    pub id: BillableId,

    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    /// Provider customer identifier; `None` until the customer is created
    #[serde(default)]
    pub stripe_id: Option<String>,

    /// Cached type of the default payment method
    #[serde(default)]
    pub pm_type: Option<String>,

    /// Cached last four digits of the default card
    #[serde(default)]
    pub pm_last_four: Option<String>,

    /// Cached expiration of the default card (`MM/YYYY`)
    #[serde(default)]
    pub pm_expiration: Option<String>,

    /// Generic trial end, used before any subscription exists
    #[serde(default)]
    pub trial_ends_at: Option<DateTime<Utc>>,

    /// Preferred currency for balance display; falls back to the configured currency
    #[serde(default)]
    pub currency: Option<String>,

    /// Locally stored subscriptions
    #[serde(default, skip_serializing)]
    pub subscriptions: Vec<Subscription>,

    /// Any other model attributes, passed through to the payload untouched
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Billable {
    /// Create a billable with only an id and a name
    pub fn new(id: BillableId, name: impl Into<String>) -> Self {
        Billable {
            id,
            name: name.into(),
            email: None,
            stripe_id: None,
            pm_type: None,
            pm_last_four: None,
            pm_expiration: None,
            trial_ends_at: None,
            currency: None,
            subscriptions: Vec::new(),
            attributes: Map::new(),
        }
    }

    /// Whether a provider customer exists for this billable
    pub fn has_stripe_id(&self) -> bool {
        self.stripe_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// The most recently created subscription of the given type
    pub fn subscription(&self, name: &str) -> Option<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|sub| sub.kind == name)
            .max_by_key(|sub| sub.created_at)
    }

    /// Whether the billable is on a trial that is not tied to a subscription
    pub fn on_generic_trial(&self, now: DateTime<Utc>) -> bool {
        self.trial_ends_at.is_some_and(|trial_ends_at| trial_ends_at > now)
    }

    /// Currency used to display the customer balance
    pub fn preferred_currency<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(fallback)
    }

    /// The model's array form, as exposed to the frontend
    ///
    /// Subscriptions are never included.
    pub fn to_array(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// The authenticated user looking at the portal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    pub name: Option<String>,

    #[serde(default)]
    pub profile_photo_url: Option<String>,
}
