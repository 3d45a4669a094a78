//! Invoice lists for the billing dashboard
//!
//! Open invoices are listed in one request. Paid invoices are cursor
//! paginated: the cursor is an opaque URL-safe token carried in the `cursor`
//! query parameter and translated into the provider's `starting_after` /
//! `ending_before` parameters.

use crate::core::format::{format_amount, DateFormat};
use crate::core::traits::{PaymentsProvider, RouteResolver};
use crate::types::{
    CursorPage, Invoice, InvoiceListParams, InvoiceStatus, InvoiceSummary, PortalError,
    PortalRequest,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{json, Value};
use url::form_urlencoded;

/// Maximum number of open invoices shown
pub const OPEN_INVOICE_LIMIT: usize = 100;

/// Paid invoices per page
pub const PAID_INVOICES_PER_PAGE: usize = 10;

/// Query parameter carrying the pagination cursor
pub const CURSOR_NAME: &str = "cursor";

/// Route used for invoice download links
pub const INVOICE_DOWNLOAD_ROUTE: &str = "spark.invoices.download";

/// Position in a paginated invoice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Invoice id the page is anchored on
    pub id: String,
    /// `true` to page towards older invoices, `false` towards newer ones
    pub points_to_next_items: bool,
}

impl Cursor {
    pub fn next(id: &str) -> Self {
        Cursor {
            id: id.to_string(),
            points_to_next_items: true,
        }
    }

    pub fn previous(id: &str) -> Self {
        Cursor {
            id: id.to_string(),
            points_to_next_items: false,
        }
    }

    /// Encode as URL-safe base64 JSON without padding
    pub fn encode(&self) -> String {
        let payload = json!({
            "id": self.id,
            "_pointsToNextItems": self.points_to_next_items,
        });
        URL_SAFE_NO_PAD.encode(payload.to_string())
    }

    /// Decode a cursor token; returns `None` for anything malformed
    pub fn decode(encoded: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .ok()?;
        let payload: Value = serde_json::from_slice(&bytes).ok()?;

        let id = match payload.get("id")? {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };
        let points_to_next_items = payload.get("_pointsToNextItems")?.as_bool()?;

        Some(Cursor {
            id,
            points_to_next_items,
        })
    }
}

/// Everything needed to turn provider invoices into dashboard rows
pub struct InvoiceContext<'a> {
    pub billable_type: &'a str,
    pub billable_id: &'a str,
    pub routes: &'a dyn RouteResolver,
    pub date_format: &'a DateFormat,
}

impl InvoiceContext<'_> {
    /// Dashboard row for one invoice
    pub fn summarize(&self, invoice: &Invoice) -> Result<InvoiceSummary, PortalError> {
        Ok(InvoiceSummary {
            amount: format_amount(invoice.raw_real_total(), &invoice.currency),
            date: self.date_format.format(&invoice.created),
            id: invoice.id.clone(),
            invoice_url: self.routes.route(
                INVOICE_DOWNLOAD_ROUTE,
                &[self.billable_type, self.billable_id, &invoice.id],
            )?,
            status: invoice.status.clone(),
        })
    }
}

/// Open invoices of the customer
///
/// Invoices belonging to a cancelled or incomplete subscription are hidden.
pub async fn open_invoices(
    provider: &dyn PaymentsProvider,
    customer_id: Option<&str>,
    context: &InvoiceContext<'_>,
) -> Result<Vec<InvoiceSummary>, PortalError> {
    let Some(customer_id) = customer_id else {
        return Ok(Vec::new());
    };

    let params = InvoiceListParams {
        status: Some(InvoiceStatus::Open),
        limit: OPEN_INVOICE_LIMIT,
        expand_subscription: true,
        ..InvoiceListParams::default()
    };
    let list = provider.list_invoices(customer_id, &params).await?;

    list.data
        .iter()
        .filter(|invoice| {
            invoice
                .subscription
                .as_ref()
                .map_or(true, |subscription| subscription.shows_open_invoices())
        })
        .map(|invoice| context.summarize(invoice))
        .collect()
}

/// One page of paid invoices, positioned by the request's `cursor` parameter
pub async fn paid_invoices(
    provider: &dyn PaymentsProvider,
    customer_id: Option<&str>,
    request: &PortalRequest,
    context: &InvoiceContext<'_>,
) -> Result<CursorPage<InvoiceSummary>, PortalError> {
    let cursor = match request.param(CURSOR_NAME) {
        Some(raw) => {
            let cursor = Cursor::decode(raw);
            if cursor.is_none() {
                tracing::warn!(cursor = raw, "Ignoring malformed invoice cursor");
            }
            cursor
        }
        None => None,
    };

    let invoices = match customer_id {
        Some(customer_id) => {
            let mut params = InvoiceListParams {
                status: Some(InvoiceStatus::Paid),
                limit: PAID_INVOICES_PER_PAGE + 1,
                ..InvoiceListParams::default()
            };
            match &cursor {
                Some(cursor) if cursor.points_to_next_items => {
                    params.starting_after = Some(cursor.id.clone())
                }
                Some(cursor) => params.ending_before = Some(cursor.id.clone()),
                None => {}
            }
            provider.list_invoices(customer_id, &params).await?.data
        }
        None => Vec::new(),
    };

    let page = paginate(invoices, PAID_INVOICES_PER_PAGE, cursor.as_ref(), request);

    Ok(CursorPage {
        data: page
            .data
            .iter()
            .map(|invoice| context.summarize(invoice))
            .collect::<Result<_, _>>()?,
        path: page.path,
        per_page: page.per_page,
        next_cursor: page.next_cursor,
        next_page_url: page.next_page_url,
        prev_cursor: page.prev_cursor,
        prev_page_url: page.prev_page_url,
    })
}

/// Build a cursor page from `per_page + 1` newest-first invoices
fn paginate(
    mut items: Vec<Invoice>,
    per_page: usize,
    cursor: Option<&Cursor>,
    request: &PortalRequest,
) -> CursorPage<Invoice> {
    let backwards = cursor.is_some_and(|cursor| !cursor.points_to_next_items);

    // Backwards pages arrive newest-first; the invoices closest to the cursor
    // are the oldest ones, so trim from that end.
    if backwards {
        items.reverse();
    }
    let has_more = items.len() > per_page;
    items.truncate(per_page);
    if backwards {
        items.reverse();
    }

    let next = match cursor {
        None | Some(Cursor {
            points_to_next_items: true,
            ..
        }) if !has_more => None,
        _ => items.last().map(|invoice| Cursor::next(&invoice.id)),
    };

    let previous = match cursor {
        None => None,
        Some(cursor) if !cursor.points_to_next_items && !has_more => None,
        Some(_) => items.first().map(|invoice| Cursor::previous(&invoice.id)),
    };

    CursorPage {
        path: request.path.clone(),
        per_page,
        next_page_url: next.as_ref().map(|cursor| page_url(request, cursor)),
        next_cursor: next.map(|cursor| cursor.encode()),
        prev_page_url: previous.as_ref().map(|cursor| page_url(request, cursor)),
        prev_cursor: previous.map(|cursor| cursor.encode()),
        data: items,
    }
}

/// Page link keeping the current query string
fn page_url(request: &PortalRequest, cursor: &Cursor) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.extend_pairs(request.query_except(CURSOR_NAME));
    query.append_pair(CURSOR_NAME, &cursor.encode());

    let separator = if request.path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", request.path, separator, query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{StaticProvider, StaticRoutes};
    use crate::types::InvoiceSubscription;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    fn invoice(id: &str, status: &str, days_ago: i64) -> Invoice {
        let base = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        Invoice {
            id: id.to_string(),
            status: status.to_string(),
            paid: status == "paid",
            total: 2500,
            starting_balance: -500,
            amount_due: 2000,
            currency: "usd".to_string(),
            created: base - Duration::days(days_ago),
            subscription: None,
        }
    }

    fn routes() -> StaticRoutes {
        StaticRoutes::default().with_route(
            INVOICE_DOWNLOAD_ROUTE,
            "/billing/{type}/{id}/invoice/{invoice}",
        )
    }

    fn paid_provider(count: usize) -> StaticProvider {
        let invoices = (0..count)
            .map(|i| invoice(&format!("in_{:02}", i), "paid", i as i64))
            .collect();
        StaticProvider::default().with_invoices("cus_1", invoices)
    }

    #[rstest]
    #[case::forward(Cursor::next("in_05"))]
    #[case::backward(Cursor::previous("in_99"))]
    fn test_cursor_round_trip(#[case] cursor: Cursor) {
        let encoded = cursor.encode();
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert_eq!(Cursor::decode(&encoded), Some(cursor));
    }

    #[rstest]
    #[case::not_base64("%%%")]
    #[case::not_json("bm90IGpzb24")]
    #[case::missing_direction("eyJpZCI6ImluXzEifQ")]
    fn test_cursor_decode_rejects_malformed(#[case] encoded: &str) {
        assert_eq!(Cursor::decode(encoded), None);
    }

    #[tokio::test]
    async fn test_open_invoices_hide_cancelled_subscriptions() {
        let mut kept = invoice("in_kept", "open", 1);
        kept.subscription = Some(InvoiceSubscription {
            id: "sub_1".to_string(),
            status: "past_due".to_string(),
        });
        let mut hidden = invoice("in_hidden", "open", 2);
        hidden.subscription = Some(InvoiceSubscription {
            id: "sub_2".to_string(),
            status: "canceled".to_string(),
        });
        let one_off = invoice("in_one_off", "open", 3);
        let paid = invoice("in_paid", "paid", 4);

        let provider =
            StaticProvider::default().with_invoices("cus_1", vec![kept, hidden, one_off, paid]);
        let routes = routes();
        let format = DateFormat::new("%Y-%m-%d").unwrap();
        let context = InvoiceContext {
            billable_type: "user",
            billable_id: "1",
            routes: &routes,
            date_format: &format,
        };

        let open = open_invoices(&provider, Some("cus_1"), &context)
            .await
            .unwrap();
        let ids: Vec<&str> = open.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["in_kept", "in_one_off"]);
        assert_eq!(open[0].amount, "$20.00");
        assert_eq!(open[0].date, "2024-06-29");
        assert_eq!(open[0].invoice_url, "/billing/user/1/invoice/in_kept");
        assert_eq!(open[0].status, "open");
    }

    #[tokio::test]
    async fn test_open_invoices_without_customer() {
        let provider = StaticProvider::default();
        let routes = routes();
        let format = DateFormat::new("%Y").unwrap();
        let context = InvoiceContext {
            billable_type: "user",
            billable_id: "1",
            routes: &routes,
            date_format: &format,
        };
        assert!(open_invoices(&provider, None, &context)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(provider.requests(), 0);
    }

    #[tokio::test]
    async fn test_paid_invoices_walk_forward_and_back() {
        let provider = paid_provider(25);
        let routes = routes();
        let format = DateFormat::new("%Y").unwrap();
        let context = InvoiceContext {
            billable_type: "user",
            billable_id: "1",
            routes: &routes,
            date_format: &format,
        };

        // First page
        let request = PortalRequest::new("/billing/user/1").with_query("tab", "invoices");
        let first = paid_invoices(&provider, Some("cus_1"), &request, &context)
            .await
            .unwrap();
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.data[0].id, "in_00");
        assert_eq!(first.data[9].id, "in_09");
        assert!(first.prev_cursor.is_none());
        let next = first.next_cursor.clone().unwrap();
        assert_eq!(Cursor::decode(&next), Some(Cursor::next("in_09")));
        assert_eq!(
            first.next_page_url.as_deref(),
            Some(format!("/billing/user/1?tab=invoices&cursor={}", next).as_str())
        );

        // Second page
        let request = PortalRequest::new("/billing/user/1")
            .with_query("tab", "invoices")
            .with_query(CURSOR_NAME, next);
        let second = paid_invoices(&provider, Some("cus_1"), &request, &context)
            .await
            .unwrap();
        assert_eq!(second.data[0].id, "in_10");
        assert_eq!(second.data[9].id, "in_19");
        assert!(second.next_cursor.is_some());
        let prev = second.prev_cursor.clone().unwrap();
        assert_eq!(Cursor::decode(&prev), Some(Cursor::previous("in_10")));

        // Last page
        let request = PortalRequest::new("/billing/user/1")
            .with_query(CURSOR_NAME, second.next_cursor.clone().unwrap());
        let last = paid_invoices(&provider, Some("cus_1"), &request, &context)
            .await
            .unwrap();
        let ids: Vec<&str> = last.data.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["in_20", "in_21", "in_22", "in_23", "in_24"]);
        assert!(last.next_cursor.is_none());
        assert!(last.prev_cursor.is_some());

        // Back to the first page
        let request = PortalRequest::new("/billing/user/1").with_query(CURSOR_NAME, prev);
        let back = paid_invoices(&provider, Some("cus_1"), &request, &context)
            .await
            .unwrap();
        assert_eq!(back.data[0].id, "in_00");
        assert_eq!(back.data[9].id, "in_09");
        assert!(back.prev_cursor.is_none());
        assert!(back.next_cursor.is_some());
    }

    #[tokio::test]
    async fn test_paid_invoices_ignore_malformed_cursor() {
        let provider = paid_provider(3);
        let routes = routes();
        let format = DateFormat::new("%Y").unwrap();
        let context = InvoiceContext {
            billable_type: "user",
            billable_id: "1",
            routes: &routes,
            date_format: &format,
        };

        let request = PortalRequest::new("/billing").with_query(CURSOR_NAME, "garbage!");
        let page = paid_invoices(&provider, Some("cus_1"), &request, &context)
            .await
            .unwrap();
        assert_eq!(page.data.len(), 3);
        assert!(page.next_cursor.is_none());
        assert!(page.prev_cursor.is_none());
        assert_eq!(page.per_page, PAID_INVOICES_PER_PAGE);
    }
}
