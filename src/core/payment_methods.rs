//! Saved payment methods shown on the billing dashboard

use crate::core::format::{format_card_expiration, ucfirst};
use crate::core::traits::PaymentsProvider;
use crate::types::{PaymentMethodSummary, PortalError};

/// Card payment methods of a customer, flagging the default one
///
/// Returns an empty list without touching the provider when the billable has
/// no customer id.
pub async fn payment_methods(
    provider: &dyn PaymentsProvider,
    customer_id: Option<&str>,
) -> Result<Vec<PaymentMethodSummary>, PortalError> {
    let Some(customer_id) = customer_id else {
        return Ok(Vec::new());
    };

    let (methods, default_id) = futures::try_join!(
        provider.list_payment_methods(customer_id),
        provider.default_payment_method(customer_id),
    )?;

    let summaries: Vec<PaymentMethodSummary> = methods
        .into_iter()
        .filter_map(|method| {
            let card = method.card?;
            Some(PaymentMethodSummary {
                default: default_id.as_deref() == Some(method.id.as_str()),
                id: method.id,
                last4: card.last4,
                brand: ucfirst(&card.brand),
                expiration: format_card_expiration(card.exp_month, card.exp_year),
                country: card.country,
            })
        })
        .collect();

    tracing::debug!(customer_id, count = summaries.len(), "Loaded payment methods");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::StaticProvider;
    use crate::types::{Card, PaymentMethod};

    fn card(id: &str, brand: &str, month: u32) -> PaymentMethod {
        PaymentMethod {
            id: id.to_string(),
            kind: "card".to_string(),
            card: Some(Card {
                brand: brand.to_string(),
                last4: "4242".to_string(),
                exp_month: month,
                exp_year: 2030,
                country: Some("US".to_string()),
            }),
        }
    }

    #[tokio::test]
    async fn test_payment_methods_flag_default() {
        let sepa = PaymentMethod {
            id: "pm_sepa".to_string(),
            kind: "sepa_debit".to_string(),
            card: None,
        };
        let provider = StaticProvider::default().with_payment_methods(
            "cus_1",
            vec![card("pm_1", "visa", 4), card("pm_2", "mastercard", 12), sepa],
            Some("pm_2"),
        );

        let methods = payment_methods(&provider, Some("cus_1")).await.unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].brand, "Visa");
        assert_eq!(methods[0].expiration, "Apr 2030");
        assert!(!methods[0].default);
        assert_eq!(methods[1].brand, "Mastercard");
        assert_eq!(methods[1].expiration, "Dec 2030");
        assert!(methods[1].default);
    }

    #[tokio::test]
    async fn test_no_default_payment_method() {
        let provider = StaticProvider::default().with_payment_methods(
            "cus_1",
            vec![card("pm_1", "amex", 1)],
            None,
        );
        let methods = payment_methods(&provider, Some("cus_1")).await.unwrap();
        assert!(!methods[0].default);
        assert_eq!(methods[0].country.as_deref(), Some("US"));
    }

    #[tokio::test]
    async fn test_without_customer() {
        let provider = StaticProvider::default();
        assert!(payment_methods(&provider, None).await.unwrap().is_empty());
        assert_eq!(provider.requests(), 0);
    }
}
