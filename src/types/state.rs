//! The billing-portal payload
//!
//! `FrontendState` has one field per key the dashboard reads. Lazy keys
//! (`balance`, `invoices`) are left out of full visits; a partial reload keeps
//! only the keys it asked for.

use super::{
    invoice::{InvoiceSummary, PaymentSummary},
    payment_method::PaymentMethodSummary,
    plan::{Interval, Plan},
    request::PropSelection,
    subscription::SubscriptionState,
    PortalError,
};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Customer balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Formatted amount without a sign
    pub formatted: String,
    /// Raw balance in minor units (negative means credit)
    pub raw: i64,
}

/// A cursor-paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub data: Vec<T>,
    pub path: String,
    pub per_page: usize,
    pub next_cursor: Option<String>,
    pub next_page_url: Option<String>,
    pub prev_cursor: Option<String>,
    pub prev_page_url: Option<String>,
}

/// Open and paid invoices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLists {
    pub open: Vec<InvoiceSummary>,
    pub paid: CursorPage<InvoiceSummary>,
}

/// Country code to name table, serialized as a JSON object in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countries(pub &'static [(&'static str, &'static str)]);

impl Countries {
    /// Name of the country with the given ISO 3166-1 alpha-2 code
    pub fn name(&self, code: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(code))
            .map(|(_, name)| *name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Countries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, name) in self.0 {
            map.serialize_entry(code, name)?;
        }
        map.end()
    }
}

/// Data shared with the billing dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendState {
    pub app_logo: Option<String>,
    pub app_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoices: Option<InvoiceLists>,

    pub billable: Value,
    pub billable_id: String,
    pub billable_name: String,
    pub billable_type: String,
    pub billing_address_required: bool,
    pub brand_color: String,
    pub pm_type: Option<String>,
    pub pm_expiration_date: Option<String>,
    pub pm_last_four: Option<String>,
    pub cashier_path: String,
    pub collection_method: Option<String>,
    pub collects_vat: bool,
    pub collects_billing_address: bool,
    pub countries: Countries,
    pub dashboard_url: String,
    pub default_interval: Interval,
    pub generic_trial_ends_at: Option<String>,
    pub last_payment: Option<PaymentSummary>,
    pub message: String,
    pub monthly_plans: Vec<Plan>,
    pub next_payment: Option<PaymentSummary>,
    pub payment_method: Option<String>,
    pub payment_methods: Vec<PaymentMethodSummary>,
    pub plan: Option<Plan>,
    pub seat_name: Option<String>,
    pub sends_invoices_to_custom_addresses: bool,
    pub spark_path: String,
    pub state: SubscriptionState,
    pub stripe_key: Option<String>,
    pub stripe_version: String,
    pub terms_url: Option<String>,
    pub trial_ends_at: Option<String>,
    pub user_avatar: Option<String>,
    pub user_name: Option<String>,
    pub yearly_plans: Vec<Plan>,
}

impl FrontendState {
    /// Serialize the payload, keeping only the keys the selection asks for
    pub fn into_props(self, selection: &PropSelection) -> Result<Map<String, Value>, PortalError> {
        let Value::Object(mut props) = serde_json::to_value(self)? else {
            return Err(PortalError::Serialization {
                message: "frontend state did not serialize to an object".to_string(),
            });
        };

        if let PropSelection::Partial(keys) = selection {
            props.retain(|key, _| keys.contains(key));
        }

        Ok(props)
    }
}
