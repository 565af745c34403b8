//! Display helpers shared by every front end.

use chrono::{DateTime, Utc};

use crate::money::Money;

/// Short customer-facing order number: `ORD-` plus the first eight
/// characters of the id, uppercased. An empty id yields an empty string.
///
/// ```rust
/// use tavola_core::format::format_order_id;
///
/// assert_eq!(format_order_id("5f2b8c1e-0d4a-4e55"), "ORD-5F2B8C1E");
/// ```
pub fn format_order_id(id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }
    let prefix: String = id.chars().take(8).collect();
    format!("ORD-{}", prefix.to_uppercase())
}

/// US-dollar amount, e.g. `$1,234.56`.
pub fn format_currency(amount: Money) -> String {
    amount.to_string()
}

/// Long-form date, e.g. `October 19, 2026`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// Like [`format_date`] but with the time of day, e.g. `October 19, 2026 at 2:05 PM`.
pub fn format_date_time(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y at %-I:%M %p").to_string()
}
