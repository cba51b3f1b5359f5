//! Order management and export

use crate::error::AdminError;
use boutique_backend::{Backend, BackendError};
use boutique_catalog::{
    FetchOutcome, Money, Order, OrderId, OrderQuery, OrderSortField, OrderStatus, Page,
    SortDirection,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use std::str::FromStr;
use std::sync::Arc;

/// Most orders a single export covers
pub const EXPORT_LIMIT: u32 = 1000;

/// Creation-date window picked in the order list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    /// Since midnight today
    Today,
    /// Last seven days
    Week,
    /// Since the same day last month
    Month,
}

impl DateFilter {
    /// Lower bound of the window at `now`, `None` for [`DateFilter::All`]
    #[must_use]
    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Today => Some(start_of_day(now.date_naive())),
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(start_of_day(same_day_last_month(now.date_naive()))),
        }
    }

    /// Apply the window to `query`
    #[must_use]
    pub fn apply(self, query: OrderQuery, now: DateTime<Utc>) -> OrderQuery {
        query.created_between(self.since(now), None)
    }
}

impl FromStr for DateFilter {
    type Err = boutique_catalog::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(boutique_catalog::ParseError::new("date filter", other)),
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Same day-of-month one month back, clamped to the month's last day
fn same_day_last_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    (1..=date.day())
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .unwrap_or(date)
}

/// One row of an order export
#[derive(Debug, Clone, PartialEq)]
pub struct OrderExportRow {
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub total: Money,
    pub status: OrderStatus,
    pub created_date: NaiveDate,
    /// `"name (qty); name (qty)"`
    pub items: String,
}

impl From<&Order> for OrderExportRow {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.clone(),
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            total: order.total_amount,
            status: order.status,
            created_date: order.created_at.date_naive(),
            items: order.items_summary(),
        }
    }
}

const EXPORT_HEADER: [&str; 7] = [
    "Order ID",
    "Customer Name",
    "Customer Email",
    "Total Price",
    "Status",
    "Created At",
    "Items",
];

/// Render export rows as CSV with a header line
#[must_use]
pub fn export_csv(rows: &[OrderExportRow]) -> String {
    let mut out = csv_line(EXPORT_HEADER.iter().map(|h| (*h).to_string()));
    for row in rows {
        out.push_str(&csv_line([
            row.order_id.to_string(),
            row.customer_name.clone(),
            row.customer_email.clone(),
            format!("{:.2}", row.total.as_decimal()),
            row.status.to_string(),
            row.created_date.format("%Y-%m-%d").to_string(),
            row.items.clone(),
        ]));
    }
    out
}

fn csv_line(fields: impl IntoIterator<Item = String>) -> String {
    let mut line = fields
        .into_iter()
        .map(|f| {
            if f.contains([',', '"', '\n', '\r']) {
                format!("\"{}\"", f.replace('"', "\"\""))
            } else {
                f
            }
        })
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Order administration over a [`Backend`]
#[derive(Clone)]
pub struct OrderManager {
    backend: Arc<dyn Backend>,
}

impl OrderManager {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// One page of orders with items
    pub async fn list(&self, query: &OrderQuery) -> FetchOutcome<Page<Order>, BackendError> {
        FetchOutcome::from_page(self.backend.fetch_orders(query).await)
    }

    /// Move an order to `status`
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, AdminError> {
        let order = self.backend.update_order_status(id, status).await?;
        tracing::info!(id = %id, status = %status, "order status updated");
        Ok(order)
    }

    /// Export rows for up to [`EXPORT_LIMIT`] orders, newest first
    ///
    /// `query` supplies the search and status filters; its paging and sort
    /// are replaced.
    pub async fn export(&self, query: &OrderQuery) -> Result<Vec<OrderExportRow>, AdminError> {
        let query = query
            .clone()
            .page(1)
            .limit(EXPORT_LIMIT)
            .sort(OrderSortField::CreatedAt, SortDirection::Desc);
        let page = self.backend.fetch_orders(&query).await?;
        tracing::info!(rows = page.items.len(), "orders exported");
        Ok(page.items.iter().map(OrderExportRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn date_filter_windows() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 15, 30, 0).unwrap();

        assert_eq!(DateFilter::All.since(now), None);
        assert_eq!(
            DateFilter::Today.since(now),
            Some(Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(
            DateFilter::Week.since(now),
            Some(Utc.with_ymd_and_hms(2025, 3, 24, 15, 30, 0).unwrap())
        );
        // 31 February does not exist
        assert_eq!(
            DateFilter::Month.since(now),
            Some(Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn month_filter_wraps_year() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(
            DateFilter::Month.since(now),
            Some(Utc.with_ymd_and_hms(2024, 12, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn date_filter_parse() {
        assert_eq!("week".parse::<DateFilter>().unwrap(), DateFilter::Week);
        assert!("year".parse::<DateFilter>().is_err());
    }

    #[test]
    fn csv_quotes_fields_with_separators() {
        let row = OrderExportRow {
            order_id: OrderId::from(7),
            customer_name: "Benali, Amina".into(),
            customer_email: "amina@example.com".into(),
            total: Money::from_minor(450_050),
            status: OrderStatus::Shipped,
            created_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            items: "Robe \"Fleurie\" (1); Jupe (2)".into(),
        };
        let csv = export_csv(&[row]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Order ID,Customer Name,Customer Email,Total Price,Status,Created At,Items"
        );
        assert_eq!(
            lines[1],
            r#"7,"Benali, Amina",amina@example.com,4500.50,shipped,2025-03-02,"Robe ""Fleurie"" (1); Jupe (2)""#
        );
    }
}
