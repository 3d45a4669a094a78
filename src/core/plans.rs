//! Plan catalog
//!
//! Turns the configured plans of a billable type into priced `Plan` records.
//! Prices are read from the payments provider, following pagination until
//! every price has been seen.

use crate::config::BillableConfig;
use crate::core::format::format_plan_price;
use crate::core::traits::PaymentsProvider;
use crate::types::{Interval, Plan, PortalError, Price, PriceListParams};
use std::collections::HashMap;

/// Page size used when listing provider prices
pub const PRICE_PAGE_SIZE: usize = 100;

/// List every provider price, following `has_more` pagination
///
/// # Errors
///
/// Propagates any provider error.
pub async fn fetch_all_prices(provider: &dyn PaymentsProvider) -> Result<Vec<Price>, PortalError> {
    let mut prices = Vec::new();
    let mut params = PriceListParams {
        limit: PRICE_PAGE_SIZE,
        starting_after: None,
    };

    loop {
        let page = provider.list_prices(&params).await?;
        let last_id = page.data.last().map(|price| price.id.clone());
        prices.extend(page.data);

        match last_id {
            Some(id) if page.has_more => params.starting_after = Some(id),
            _ => break,
        }
    }

    tracing::debug!(count = prices.len(), "Fetched provider prices");
    Ok(prices)
}

/// Expand configured plans into one plan per offered interval
///
/// Plans without a `monthly_id` or `yearly_id` simply do not offer that
/// interval. Prices are not filled in yet.
pub fn configured_plans(config: &BillableConfig) -> Vec<Plan> {
    config
        .plans
        .iter()
        .flat_map(|plan| {
            [
                (plan.monthly_id.as_ref(), Interval::Monthly),
                (plan.yearly_id.as_ref(), Interval::Yearly),
            ]
            .into_iter()
            .filter_map(move |(id, interval)| {
                id.map(|id| Plan {
                    id: id.clone(),
                    name: plan.name.clone(),
                    short_description: plan.short_description.clone(),
                    interval,
                    features: plan.features.clone(),
                    options: plan.options.clone(),
                    active: !plan.archived,
                    trial_days: plan.trial_days.or(config.trial_days),
                    raw_price: None,
                    price: None,
                    currency: None,
                })
            })
        })
        .collect()
}

/// Fill in price, raw price and currency of every plan
///
/// # Errors
///
/// Returns `MissingPrice` for the first plan whose price the provider does not know.
pub fn price_plans(plans: Vec<Plan>, prices: &[Price]) -> Result<Vec<Plan>, PortalError> {
    let by_id: HashMap<&str, &Price> = prices
        .iter()
        .map(|price| (price.id.as_str(), price))
        .collect();

    plans
        .into_iter()
        .map(|mut plan| {
            let price = by_id
                .get(plan.id.as_str())
                .ok_or_else(|| PortalError::missing_price(&plan.id))?;

            plan.raw_price = price.unit_amount;
            plan.price = Some(format_plan_price(
                price.unit_amount.unwrap_or(0),
                &price.currency,
            ));
            plan.currency = Some(price.currency.clone());
            Ok(plan)
        })
        .collect()
}

/// Priced plan catalog of a billable type
pub async fn plan_catalog(
    provider: &dyn PaymentsProvider,
    config: &BillableConfig,
) -> Result<Vec<Plan>, PortalError> {
    let plans = configured_plans(config);
    if plans.is_empty() {
        return Ok(plans);
    }

    let prices = fetch_all_prices(provider).await?;
    price_plans(plans, &prices)
}

/// Active plans of one interval, in catalog order
pub fn offered(plans: &[Plan], interval: Interval) -> Vec<Plan> {
    plans
        .iter()
        .filter(|plan| plan.interval == interval && plan.active)
        .cloned()
        .collect()
}
