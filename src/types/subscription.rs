//! Subscription-related types for the billing portal
//!
//! This module defines the locally stored subscription row, the status
//! predicates the portal relies on, and the derived subscription state
//! shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription type name used by the billing portal
pub const DEFAULT_SUBSCRIPTION: &str = "default";

/// A subscription row belonging to a billable
///
/// Mirrors the payments-provider subscription as it was last synchronised.
/// All time-based predicates take `now` explicitly so callers control the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Provider subscription identifier
    pub stripe_id: String,

    /// Subscription type (the portal reads the `default` one)
    #[serde(rename = "type", default = "default_subscription_type")]
    pub kind: String,

    /// Raw provider status (`active`, `past_due`, `incomplete`, ...)
    pub stripe_status: String,

    /// Price the subscription is billed on
    #[serde(default)]
    pub stripe_price: Option<String>,

    #[serde(default)]
    pub quantity: Option<u32>,

    #[serde(default)]
    pub trial_ends_at: Option<DateTime<Utc>>,

    /// Set once the subscription has been cancelled
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

fn default_subscription_type() -> String {
    DEFAULT_SUBSCRIPTION.to_string()
}

impl Subscription {
    /// Whether the first payment has not been confirmed yet
    pub fn incomplete(&self) -> bool {
        self.stripe_status == "incomplete"
    }

    /// Whether the latest payment failed and is being retried
    pub fn past_due(&self) -> bool {
        self.stripe_status == "past_due"
    }

    /// Whether the subscription has been cancelled (ended or not)
    pub fn canceled(&self) -> bool {
        self.ends_at.is_some()
    }

    /// Whether the subscription is cancelled but still within its paid period
    pub fn on_grace_period(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at > now)
    }

    /// Whether the subscription is cancelled and its paid period is over
    pub fn ended(&self, now: DateTime<Utc>) -> bool {
        self.canceled() && !self.on_grace_period(now)
    }

    /// Whether the subscription currently grants access
    ///
    /// Incomplete, expired, past-due and unpaid subscriptions are never active.
    pub fn active(&self, now: DateTime<Utc>) -> bool {
        !self.ended(now)
            && !matches!(
                self.stripe_status.as_str(),
                "incomplete" | "incomplete_expired" | "past_due" | "unpaid"
            )
    }

    /// Whether the subscription is still inside its trial
    pub fn on_trial(&self, now: DateTime<Utc>) -> bool {
        self.trial_ends_at.is_some_and(|trial_ends_at| trial_ends_at > now)
    }
}

/// A subscription as retrieved live from the payments provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSubscription {
    pub id: String,
    pub status: String,
    /// `charge_automatically` or `send_invoice`
    #[serde(default)]
    pub collection_method: Option<String>,
}

/// Subscription state presented to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionState {
    /// No usable subscription
    #[serde(rename = "none")]
    None,

    /// Checkout just finished; the provider webhook has not landed yet
    #[serde(rename = "pending")]
    Pending,

    #[serde(rename = "active")]
    Active,

    #[serde(rename = "past_due")]
    PastDue,

    /// Cancelled, but the paid period has not run out
    #[serde(rename = "onGracePeriod")]
    OnGracePeriod,
}

impl SubscriptionState {
    /// Derive the dashboard state from the current subscription
    ///
    /// # Arguments
    ///
    /// * `subscription` - The billable's subscription, with incomplete ones already removed
    /// * `checkout` - The `checkout` request parameter, if present
    /// * `now` - Reference time for grace-period checks
    pub fn derive(
        subscription: Option<&Subscription>,
        checkout: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        match subscription {
            None if checkout == Some("subscription_started") => SubscriptionState::Pending,
            Some(sub) if sub.on_grace_period(now) => SubscriptionState::OnGracePeriod,
            Some(sub) if sub.active(now) => SubscriptionState::Active,
            Some(sub) if sub.past_due() => SubscriptionState::PastDue,
            _ => SubscriptionState::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn subscription(status: &str, ends_in_days: Option<i64>) -> Subscription {
        Subscription {
            stripe_id: "sub_1".to_string(),
            kind: DEFAULT_SUBSCRIPTION.to_string(),
            stripe_status: status.to_string(),
            stripe_price: Some("price_monthly".to_string()),
            quantity: Some(1),
            trial_ends_at: None,
            ends_at: ends_in_days.map(|days| now() + Duration::days(days)),
            created_at: now() - Duration::days(30),
        }
    }

    #[rstest]
    #[case::active("active", None, true)]
    #[case::trialing("trialing", None, true)]
    #[case::past_due("past_due", None, false)]
    #[case::incomplete("incomplete", None, false)]
    #[case::incomplete_expired("incomplete_expired", None, false)]
    #[case::unpaid("unpaid", None, false)]
    #[case::grace_period("active", Some(5), true)]
    #[case::ended("canceled", Some(-5), false)]
    fn test_active(#[case] status: &str, #[case] ends: Option<i64>, #[case] expected: bool) {
        assert_eq!(subscription(status, ends).active(now()), expected);
    }

    #[test]
    fn test_grace_period_requires_future_end() {
        assert!(subscription("active", Some(1)).on_grace_period(now()));
        assert!(!subscription("active", Some(-1)).on_grace_period(now()));
        assert!(!subscription("active", None).on_grace_period(now()));
        assert!(subscription("canceled", Some(-1)).ended(now()));
    }

    #[test]
    fn test_on_trial() {
        let mut sub = subscription("trialing", None);
        assert!(!sub.on_trial(now()));
        sub.trial_ends_at = Some(now() + Duration::days(3));
        assert!(sub.on_trial(now()));
        sub.trial_ends_at = Some(now() - Duration::days(3));
        assert!(!sub.on_trial(now()));
    }

    #[rstest]
    #[case::pending(None, Some("subscription_started"), SubscriptionState::Pending)]
    #[case::none_without_checkout(None, None, SubscriptionState::None)]
    #[case::none_other_checkout(None, Some("cancelled"), SubscriptionState::None)]
    #[case::grace(Some(("active", Some(10))), None, SubscriptionState::OnGracePeriod)]
    #[case::active(Some(("active", None)), Some("subscription_started"), SubscriptionState::Active)]
    #[case::past_due(Some(("past_due", None)), None, SubscriptionState::PastDue)]
    #[case::unpaid(Some(("unpaid", None)), None, SubscriptionState::None)]
    #[case::ended(Some(("canceled", Some(-1))), None, SubscriptionState::None)]
    fn test_state_derivation(
        #[case] sub: Option<(&str, Option<i64>)>,
        #[case] checkout: Option<&str>,
        #[case] expected: SubscriptionState,
    ) {
        let sub = sub.map(|(status, ends)| subscription(status, ends));
        assert_eq!(
            SubscriptionState::derive(sub.as_ref(), checkout, now()),
            expected
        );
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&SubscriptionState::OnGracePeriod).unwrap(),
            "\"onGracePeriod\""
        );
        assert_eq!(
            serde_json::to_string(&SubscriptionState::PastDue).unwrap(),
            "\"past_due\""
        );
    }
}
