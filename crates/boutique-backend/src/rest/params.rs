//! PostgREST query-string building and response header parsing
//!
//! Pure functions, kept apart from the HTTP client so they can be tested
//! without a server.

use crate::error::BackendError;
use boutique_catalog::{OrderQuery, OrderSortField, ProductQuery, RowRange};

/// Query pairs as sent on the wire; keys may repeat
pub type QueryPairs = Vec<(String, String)>;

/// Columns selected for order listings, items and product names joined
pub const ORDER_SELECT: &str = "order_id,customer_name,customer_email,customer_phone,\
shipping_address,order_date,status,total_amount,\
order_items(order_item_id,order_id,product_id,quantity,price_each,products(name,main_image_url))";

/// Columns selected for order item listings
pub const ORDER_ITEM_SELECT: &str =
    "order_item_id,order_id,product_id,quantity,price_each,products(name,main_image_url)";

/// Query pairs for a product listing
pub fn product_params(query: &ProductQuery) -> QueryPairs {
    let mut pairs = vec![pair("select", "*")];
    if let Some(search) = &query.search {
        let pattern = ilike(search);
        pairs.push(pair(
            "or",
            format!("(name.ilike.{pattern},category.ilike.{pattern},name_ar.ilike.{pattern})"),
        ));
    }
    if let Some(category) = &query.category {
        pairs.push(pair("category", format!("eq.{category}")));
    }
    if let Some(status) = query.status {
        pairs.push(pair("status", format!("eq.{status}")));
    }
    if let Some(threshold) = query.stock_below {
        pairs.push(pair("stock", format!("lt.{threshold}")));
    }
    pairs.push(pair(
        "order",
        format!("{}.{}", query.sort_by.column(), query.direction.as_str()),
    ));
    push_range(&mut pairs, query.range());
    pairs
}

/// Query pairs for an order listing
///
/// Only an all-digit search term is matched against the order id; the key
/// column is an integer and PostgREST rejects a text comparison.
pub fn order_params(query: &OrderQuery) -> QueryPairs {
    let mut pairs = vec![pair("select", ORDER_SELECT)];
    if let Some(search) = &query.search {
        let pattern = ilike(search);
        let mut alternatives = Vec::with_capacity(3);
        if !search.is_empty() && search.bytes().all(|b| b.is_ascii_digit()) {
            alternatives.push(format!("order_id.eq.{search}"));
        }
        alternatives.push(format!("customer_name.ilike.{pattern}"));
        alternatives.push(format!("customer_email.ilike.{pattern}"));
        pairs.push(pair("or", format!("({})", alternatives.join(","))));
    }
    if let Some(status) = query.status {
        pairs.push(pair("status", format!("eq.{status}")));
    }
    if let Some(from) = query.created_from {
        pairs.push(pair("order_date", format!("gte.{}", from.to_rfc3339())));
    }
    if let Some(before) = query.created_before {
        pairs.push(pair("order_date", format!("lt.{}", before.to_rfc3339())));
    }
    pairs.push(pair(
        "order",
        format!("{}.{}", order_column(query.sort_by), query.direction.as_str()),
    ));
    push_range(&mut pairs, query.range());
    pairs
}

/// Column name in the `orders` table for a sort field
pub fn order_column(field: OrderSortField) -> &'static str {
    match field {
        OrderSortField::CreatedAt => "order_date",
        other => other.column(),
    }
}

/// Single-row filter `column=eq.value`
pub fn eq_filter(column: &str, value: impl std::fmt::Display) -> (String, String) {
    pair(column, format!("eq.{value}"))
}

/// Total row count from a `Content-Range` header
///
/// `0-9/42` and `*/0` carry a count; `0-9/*` means the server did not
/// count, which reads as `None`.
pub fn parse_content_range(header: &str) -> Result<Option<u64>, BackendError> {
    let invalid = || BackendError::ContentRange(header.to_string());
    let (range, total) = header.trim().split_once('/').ok_or_else(invalid)?;

    if range != "*" {
        let (from, to) = range.split_once('-').ok_or_else(invalid)?;
        let from: u64 = from.parse().map_err(|_| invalid())?;
        let to: u64 = to.parse().map_err(|_| invalid())?;
        if to < from {
            return Err(invalid());
        }
    }

    match total {
        "*" => Ok(None),
        n => n.parse().map(Some).map_err(|_| invalid()),
    }
}

fn push_range(pairs: &mut QueryPairs, range: RowRange) {
    pairs.push(pair("offset", range.from.to_string()));
    pairs.push(pair("limit", range.len().to_string()));
}

/// `*term*` pattern, quoted when the term holds PostgREST reserved characters
fn ilike(term: &str) -> String {
    let pattern = format!("*{term}*");
    if term.contains([',', '(', ')', '"', '\\', ':']) {
        let escaped = pattern.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        pattern
    }
}

fn pair(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_catalog::{OrderStatus, ProductSortField, SortDirection};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn get<'a>(pairs: &'a QueryPairs, key: &str) -> Vec<&'a str> {
        pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn product_params_default() {
        let pairs = product_params(&ProductQuery::new());
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), "name.asc".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn product_params_search_and_filters() {
        let query = ProductQuery::new()
            .page(3)
            .limit(20)
            .search("robe")
            .sort(ProductSortField::Price, SortDirection::Desc)
            .stock_below(10);
        let pairs = product_params(&query);

        assert_eq!(
            get(&pairs, "or"),
            vec!["(name.ilike.*robe*,category.ilike.*robe*,name_ar.ilike.*robe*)"]
        );
        assert_eq!(get(&pairs, "stock"), vec!["lt.10"]);
        assert_eq!(get(&pairs, "order"), vec!["price.desc"]);
        assert_eq!(get(&pairs, "offset"), vec!["40"]);
        assert_eq!(get(&pairs, "limit"), vec!["20"]);
    }

    #[test]
    fn search_with_reserved_chars_is_quoted() {
        let pairs = product_params(&ProductQuery::new().search("a,b"));
        assert_eq!(
            get(&pairs, "or"),
            vec![r#"(name.ilike."*a,b*",category.ilike."*a,b*",name_ar.ilike."*a,b*")"#]
        );
    }

    #[test]
    fn order_params_numeric_search_matches_id() {
        let pairs = order_params(&OrderQuery::new().search("42"));
        assert_eq!(
            get(&pairs, "or"),
            vec!["(order_id.eq.42,customer_name.ilike.*42*,customer_email.ilike.*42*)"]
        );
        assert_eq!(get(&pairs, "order"), vec!["order_date.desc"]);
    }

    #[test]
    fn order_params_text_search_skips_id() {
        let pairs = order_params(&OrderQuery::new().search("amina"));
        assert_eq!(
            get(&pairs, "or"),
            vec!["(customer_name.ilike.*amina*,customer_email.ilike.*amina*)"]
        );
    }

    #[test]
    fn order_params_status_and_dates() {
        let from = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let query = OrderQuery::new()
            .status(OrderStatus::Delivered)
            .created_between(Some(from), Some(before));
        let pairs = order_params(&query);

        assert_eq!(get(&pairs, "status"), vec!["eq.delivered"]);
        assert_eq!(
            get(&pairs, "order_date"),
            vec!["gte.2025-02-01T00:00:00+00:00", "lt.2025-03-01T00:00:00+00:00"]
        );
    }

    #[test]
    fn content_range_parsing() {
        assert_eq!(parse_content_range("0-9/42").unwrap(), Some(42));
        assert_eq!(parse_content_range("*/0").unwrap(), Some(0));
        assert_eq!(parse_content_range("0-9/*").unwrap(), None);
        assert!(parse_content_range("garbage").is_err());
        assert!(parse_content_range("9-0/10").is_err());
        assert!(parse_content_range("0-9/many").is_err());
    }
}
