//! Display formatting for amounts and dates
//!
//! Amounts arrive from the payments provider in minor units. They are
//! converted with `rust_decimal` using the currency's ISO 4217 exponent and
//! rendered the way an English locale renders currency: symbol first,
//! thousands separated by commas, sign in front.

use crate::types::PortalError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// ISO 4217 currencies without minor units
const ZERO_DECIMAL: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "UYI", "VND",
    "VUV", "XAF", "XOF", "XPF",
];

/// ISO 4217 currencies with three decimal places
const THREE_DECIMAL: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// English-locale currency symbols
const SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CAD", "CA$"),
    ("AUD", "A$"),
    ("NZD", "NZ$"),
    ("HKD", "HK$"),
    ("MXN", "MX$"),
    ("BRL", "R$"),
    ("INR", "₹"),
    ("CNY", "CN¥"),
    ("KRW", "₩"),
    ("ILS", "₪"),
    ("TWD", "NT$"),
    ("VND", "₫"),
    ("PHP", "₱"),
    ("XCD", "EC$"),
    ("XAF", "FCFA"),
];

/// Number of decimal places of a currency
pub fn minor_units(currency: &str) -> u32 {
    let code = currency.to_ascii_uppercase();
    if ZERO_DECIMAL.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL.contains(&code.as_str()) {
        3
    } else {
        2
    }
}

/// Format an amount given in minor units
///
/// # Examples
///
/// ```
/// use billing_portal::core::format::format_amount;
///
/// assert_eq!(format_amount(123456, "usd"), "$1,234.56");
/// assert_eq!(format_amount(-500, "eur"), "-€5.00");
/// assert_eq!(format_amount(1500, "jpy"), "¥1,500");
/// ```
pub fn format_amount(amount: i64, currency: &str) -> String {
    let code = currency.to_ascii_uppercase();
    let value = Decimal::new(amount, minor_units(&code)).abs();
    let digits = value.to_string();

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut number = group_thousands(whole);
    if let Some(fraction) = fraction {
        number.push('.');
        number.push_str(fraction);
    }

    let sign = if amount < 0 { "-" } else { "" };
    match SYMBOLS.iter().find(|(candidate, _)| *candidate == code) {
        Some((_, symbol)) => format!("{}{}{}", sign, symbol, number),
        None => format!("{}{}\u{a0}{}", sign, code, number),
    }
}

/// Format a plan price, dropping zero cents (`$10.00` becomes `$10`)
pub fn format_plan_price(amount: i64, currency: &str) -> String {
    let mut price = format_amount(amount, currency);
    if price.ends_with(".00") {
        price.truncate(price.len() - 3);
    }
    if price.ends_with(".0") {
        price.truncate(price.len() - 2);
    }
    price
}

/// Format a customer balance without its sign
pub fn format_balance(amount: i64, currency: &str) -> String {
    format_amount(amount, currency)
        .trim_start_matches('-')
        .to_string()
}

/// Card expiration as `Mon YYYY`
pub fn format_card_expiration(month: u32, year: i32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date.format("%b %Y").to_string(),
        None => format!("{:02}/{}", month, year),
    }
}

/// Upper-case the first character
pub fn ucfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, ch) in whole.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// A validated chrono format string for displayed dates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat(String);

impl DateFormat {
    /// Validate a chrono format string
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the string contains an unknown specifier.
    pub fn new(pattern: &str) -> Result<Self, PortalError> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(PortalError::config(
                None,
                format!("invalid date_format '{}'", pattern),
            ));
        }
        Ok(DateFormat(pattern.to_string()))
    }

    pub fn format(&self, date: &DateTime<Utc>) -> String {
        date.format(&self.0).to_string()
    }
}
