//! Testing utilities for the boutique workspace
//!
//! Shared fixtures, failing stores and a seeded in-memory backend.

#![allow(missing_docs)]

use boutique_backend::MemoryBackend;
use boutique_catalog::{
    Money, Order, OrderId, OrderItem, OrderItemId, OrderStatus, Product, ProductId,
};
use boutique_storage::{KeyValueStore, MemoryStore, StorageError};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub const ADMIN_EMAIL: &str = "owner@boutique.dz";
pub const ADMIN_PASSWORD: &str = "rose-garden";

/// 1000 DZD dress in M/L, red by default
pub fn product_a() -> Product {
    let mut product = Product::new(1, "Robe Fleurie", Money::from_major(1000))
        .with_names(Some("Robe Fleurie"), Some("فستان مزهر"))
        .with_category("robes")
        .with_color("Red")
        .with_image("https://cdn.example/robe.jpg")
        .with_stock(25);
    product.sizes = vec!["M".into(), "L".into()];
    product.colors = vec!["Red".into(), "Blue".into()];
    product
}

/// 500 DZD scarf without variants
pub fn product_b() -> Product {
    Product::new(2, "Foulard", Money::from_major(500))
        .with_category("accessoires")
        .with_stock(4)
}

pub fn product_c() -> Product {
    Product::new(3, "Jupe Plissée", Money::from_major(1800))
        .with_category("bas")
        .with_size("S")
        .with_stock(0)
}

pub fn sample_products() -> Vec<Product> {
    vec![product_a(), product_b(), product_c()]
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn create_order(
    id: i64,
    email: &str,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    lines: &[(&Product, u32)],
) -> Order {
    let items: Vec<OrderItem> = lines
        .iter()
        .enumerate()
        .map(|(n, (product, qty))| OrderItem {
            id: OrderItemId::from(id * 100 + n as i64),
            order_id: Some(OrderId::from(id)),
            product_id: product.id.clone(),
            quantity: *qty,
            price_each: product.price,
            product: None,
        })
        .collect();
    Order {
        id: OrderId::from(id),
        customer_name: email.split('@').next().unwrap().to_string(),
        customer_email: email.to_string(),
        customer_phone: "0555 12 34 56".to_string(),
        shipping_address: "12 Rue Didouche Mourad, Alger".to_string(),
        created_at,
        status,
        total_amount: items.iter().map(OrderItem::line_total).sum(),
        items,
    }
}

/// Orders in February and March 2025
pub fn sample_orders() -> Vec<Order> {
    let (a, b, c) = (product_a(), product_b(), product_c());
    vec![
        create_order(1, "amina@example.com", OrderStatus::Delivered, at(2025, 2, 10), &[(&a, 2)]),
        create_order(2, "yacine@example.com", OrderStatus::Delivered, at(2025, 3, 3), &[(&a, 1), (&b, 2)]),
        create_order(3, "amina@example.com", OrderStatus::Pending, at(2025, 3, 12), &[(&c, 1)]),
        create_order(4, "sara@example.com", OrderStatus::Cancelled, at(2025, 3, 15), &[(&b, 1)]),
    ]
}

pub fn seeded_backend() -> Arc<MemoryBackend> {
    Arc::new(
        MemoryBackend::new()
            .with_products(sample_products())
            .with_orders(sample_orders()),
    )
}

pub fn product_id(n: i64) -> ProductId {
    ProductId::from(n)
}

/// Store that reads from memory but rejects every write
#[derive(Debug, Default)]
pub struct FailingWriteStore {
    inner: MemoryStore,
}

impl FailingWriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStore::with_slot(key, value),
        }
    }
}

impl KeyValueStore for FailingWriteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::unavailable("quota exceeded"))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::unavailable("storage disabled"))
    }
}

/// Store whose reads fail and whose writes succeed
#[derive(Debug, Default)]
pub struct FailingReadStore {
    inner: MemoryStore,
}

impl FailingReadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots written so far, readable despite the failing `get`
    pub fn written(&self) -> &MemoryStore {
        &self.inner
    }
}

impl KeyValueStore for FailingReadStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::unavailable("storage disabled"))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
