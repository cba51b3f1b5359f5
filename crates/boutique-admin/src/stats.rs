//! Sales statistics
//!
//! Aggregation is done by pure functions over fetched rows. Only delivered
//! orders count as revenue. [`Statistics`] fetches the rows and wraps the
//! results in [`FetchOutcome`] so a failed read is never shown as zeros.

use crate::orders::EXPORT_LIMIT;
use boutique_backend::{Backend, BackendError};
use boutique_catalog::{
    FetchOutcome, Money, Order, OrderItem, OrderQuery, OrderStatus, ProductId, ProductQuery,
    LOW_STOCK_THRESHOLD,
};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_orders: u64,
    /// Sum over delivered orders
    pub total_revenue: Money,
    pub low_stock_items: u64,
    /// Distinct customer emails across all orders
    pub total_customers: u64,
    /// Delivered revenue, this month against last month, in percent
    pub revenue_growth: f64,
    /// Order count, this month against last month, in percent
    pub order_growth: f64,
    pub status_distribution: BTreeMap<OrderStatus, u64>,
}

impl DashboardStats {
    /// Whether the shop has neither products nor orders
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_products == 0 && self.total_orders == 0
    }
}

/// Revenue and order count for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    /// `"Mar 2025"`
    pub period: String,
    pub month_start: NaiveDate,
    pub revenue: Money,
    pub orders: u64,
}

/// Sales of one product across all order items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub main_image_url: Option<String>,
    pub total_quantity: u64,
    pub total_revenue: Money,
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0
#[must_use]
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Midnight UTC on the first day of the month `back` months before `now`
#[must_use]
pub fn month_start(now: DateTime<Utc>, back: u32) -> DateTime<Utc> {
    let index = (now.year() * 12 + i32::try_from(now.month0()).unwrap_or(0))
        .saturating_sub(i32::try_from(back).unwrap_or(i32::MAX));
    let year = index.div_euclid(12);
    #[allow(clippy::cast_sign_loss)]
    let month = index.rem_euclid(12) as u32 + 1;
    let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn in_window(order: &Order, from: DateTime<Utc>, before: Option<DateTime<Utc>>) -> bool {
    order.created_at >= from && before.map_or(true, |b| order.created_at < b)
}

fn delivered_revenue<'a>(orders: impl Iterator<Item = &'a Order>) -> Money {
    orders
        .filter(|o| o.status.counts_as_revenue())
        .map(|o| o.total_amount)
        .sum()
}

/// Dashboard numbers from every order and two product counts
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(
    total_products: u64,
    low_stock_items: u64,
    orders: &[Order],
    now: DateTime<Utc>,
) -> DashboardStats {
    let this_month = month_start(now, 0);
    let last_month = month_start(now, 1);

    let current: Vec<&Order> = orders
        .iter()
        .filter(|o| in_window(o, this_month, None))
        .collect();
    let previous: Vec<&Order> = orders
        .iter()
        .filter(|o| in_window(o, last_month, Some(this_month)))
        .collect();

    let customers: HashSet<String> = orders
        .iter()
        .map(|o| o.customer_email.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    let mut status_distribution = BTreeMap::new();
    for order in orders {
        *status_distribution.entry(order.status).or_insert(0) += 1;
    }

    DashboardStats {
        total_products,
        total_orders: orders.len() as u64,
        total_revenue: delivered_revenue(orders.iter()),
        low_stock_items,
        total_customers: customers.len() as u64,
        revenue_growth: growth_percent(
            delivered_revenue(current.iter().copied()).as_decimal(),
            delivered_revenue(previous.iter().copied()).as_decimal(),
        ),
        order_growth: growth_percent(current.len() as f64, previous.len() as f64),
        status_distribution,
    }
}

/// Revenue per month for the last `months` months, oldest first
#[must_use]
pub fn monthly_revenue(orders: &[Order], months: u32, now: DateTime<Utc>) -> Vec<MonthlyRevenue> {
    (0..months)
        .rev()
        .map(|back| {
            let start = month_start(now, back);
            let end = (back > 0).then(|| month_start(now, back - 1));
            let in_month: Vec<&Order> = orders
                .iter()
                .filter(|o| in_window(o, start, end))
                .collect();
            MonthlyRevenue {
                period: start.format("%b %Y").to_string(),
                month_start: start.date_naive(),
                revenue: delivered_revenue(in_month.iter().copied()),
                orders: in_month.len() as u64,
            }
        })
        .collect()
}

/// Products ranked by revenue over `items`, at most `limit`
#[must_use]
pub fn top_products(items: &[OrderItem], limit: usize) -> Vec<TopProduct> {
    let mut by_product: HashMap<&ProductId, TopProduct> = HashMap::new();
    for item in items {
        let entry = by_product
            .entry(&item.product_id)
            .or_insert_with(|| TopProduct {
                product_id: item.product_id.clone(),
                name: item.product_name().to_string(),
                main_image_url: item.product.as_ref().and_then(|p| p.main_image_url.clone()),
                total_quantity: 0,
                total_revenue: Money::ZERO,
            });
        entry.total_quantity += u64::from(item.quantity);
        entry.total_revenue = entry.total_revenue + item.line_total();
    }

    let mut ranked: Vec<TopProduct> = by_product.into_values().collect();
    ranked.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| b.total_quantity.cmp(&a.total_quantity))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Statistics over a [`Backend`]
#[derive(Clone)]
pub struct Statistics {
    backend: Arc<dyn Backend>,
    low_stock_threshold: u32,
}

impl Statistics {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
        }
    }

    /// With low-stock threshold (exclusive)
    #[inline]
    #[must_use]
    pub fn with_low_stock_threshold(mut self, threshold: u32) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Dashboard numbers as of now
    pub async fn dashboard(&self) -> FetchOutcome<DashboardStats, BackendError> {
        self.dashboard_at(Utc::now()).await
    }

    /// Dashboard numbers as of `now`
    pub async fn dashboard_at(&self, now: DateTime<Utc>) -> FetchOutcome<DashboardStats, BackendError> {
        FetchOutcome::classify(self.load_dashboard(now).await, DashboardStats::is_empty)
    }

    async fn load_dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats, BackendError> {
        let total_products = self
            .backend
            .fetch_products(&ProductQuery::new().limit(1))
            .await?
            .total_count;
        let low_stock_items = self
            .backend
            .fetch_products(&ProductQuery::new().stock_below(self.low_stock_threshold).limit(1))
            .await?
            .total_count;
        let orders = self.all_orders().await?;
        Ok(summarize(total_products, low_stock_items, &orders, now))
    }

    /// Monthly revenue for the last `months` months as of `now`
    pub async fn revenue_series(
        &self,
        months: u32,
        now: DateTime<Utc>,
    ) -> FetchOutcome<Vec<MonthlyRevenue>, BackendError> {
        let result = self
            .all_orders()
            .await
            .map(|orders| monthly_revenue(&orders, months, now));
        FetchOutcome::classify(result, |series| series.iter().all(|m| m.orders == 0))
    }

    /// Best-selling products by revenue
    pub async fn top_products(&self, limit: usize) -> FetchOutcome<Vec<TopProduct>, BackendError> {
        let result = self
            .backend
            .fetch_order_items()
            .await
            .map(|items| top_products(&items, limit));
        FetchOutcome::from_rows(result)
    }

    async fn all_orders(&self) -> Result<Vec<Order>, BackendError> {
        let mut orders = Vec::new();
        let mut page = 1;
        loop {
            let query = OrderQuery::new().page(page).limit(EXPORT_LIMIT);
            let batch = self.backend.fetch_orders(&query).await?;
            let done = batch.items.is_empty() || u64::from(page) >= batch.total_pages;
            orders.extend(batch.items);
            if done {
                break;
            }
            page += 1;
        }
        tracing::debug!(orders = orders.len(), "orders loaded for statistics");
        Ok(orders)
    }
}
