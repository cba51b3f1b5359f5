//! Orders, order items and checkout inserts

use crate::error::ParseError;
use crate::ids::{OrderId, OrderItemId, ProductId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fulfilment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Submitted, awaiting confirmation
    #[default]
    Pending,
    /// Confirmed and being prepared
    Processing,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled before delivery
    Cancelled,
    /// Money returned
    Refunded,
}

impl OrderStatus {
    /// Every status, in fulfilment order
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Whether the order's amount counts as earned revenue
    #[inline]
    #[must_use]
    pub fn counts_as_revenue(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseError::new("order status", s))
    }
}

/// Product summary embedded in an order item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image_url: Option<String>,
}

/// Row from the `order_items` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "order_item_id")]
    pub id: OrderItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_each: Money,
    /// Joined product columns, when selected
    #[serde(default, alias = "products", skip_serializing_if = "Option::is_none")]
    pub product: Option<OrderItemProduct>,
}

impl OrderItem {
    /// Quantity times unit price
    #[inline]
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price_each.times(self.quantity)
    }

    /// Product name, or a placeholder when the join is missing
    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .map_or("Unknown Product", |p| p.name.as_str())
    }
}

/// Row from the `orders` table with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "order_id")]
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(alias = "order_date")]
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Money,
    #[serde(default, alias = "order_items")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Total number of units across items
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// `"name (qty); name (qty)"` summary used in exports
    #[must_use]
    pub fn items_summary(&self) -> String {
        self.items
            .iter()
            .map(|i| format!("{} ({})", i.product_name(), i.quantity))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Insert payload for a new order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub total_amount: Money,
    pub status: OrderStatus,
}

/// Insert payload for one order item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_each: Money,
}
