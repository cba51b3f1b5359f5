//! In-memory backend query and write semantics

use boutique_backend::{Backend, BackendError, MemoryBackend};
use boutique_catalog::{
    Money, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderQuery,
    OrderSortField, OrderStatus, Product, ProductDraft, ProductId, ProductQuery, ProductSortField,
    SortDirection,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Robe Fleurie", Money::from_major(4500))
            .with_category("robes")
            .with_stock(3),
        Product::new(2, "Chemise", Money::from_major(2500))
            .with_category("hauts")
            .with_stock(40),
        Product::new(3, "Jupe", Money::from_major(1800))
            .with_category("bas")
            .with_stock(9),
        Product::new(4, "Robe Soirée", Money::from_major(9000))
            .with_category("robes")
            .with_stock(12),
    ]
}

fn order(id: i64, name: &str, status: OrderStatus, day: u32) -> Order {
    Order {
        id: OrderId::from(id),
        customer_name: name.to_string(),
        customer_email: format!("{}@example.com", name.to_lowercase()),
        customer_phone: "0555000000".to_string(),
        shipping_address: "Alger".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap(),
        status,
        total_amount: Money::from_major(1000 * u64::from(day)),
        items: vec![OrderItem {
            id: OrderItemId::from(id * 10),
            order_id: None,
            product_id: ProductId::from(1),
            quantity: 1,
            price_each: Money::from_major(4500),
            product: None,
        }],
    }
}

fn seeded() -> MemoryBackend {
    MemoryBackend::new().with_products(catalog()).with_orders([
        order(1, "Amina", OrderStatus::Delivered, 1),
        order(2, "Yacine", OrderStatus::Pending, 2),
        order(3, "Sara", OrderStatus::Delivered, 3),
    ])
}

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn products_sorted_by_name_by_default() {
    let page = seeded().fetch_products(&ProductQuery::new()).await.unwrap();

    assert_eq!(page.total_count, 4);
    assert_eq!(page.total_pages, 1);
    assert_eq!(
        names(&page.items),
        vec!["Chemise", "Jupe", "Robe Fleurie", "Robe Soirée"]
    );
}

#[tokio::test]
async fn products_paginate_with_exact_total() {
    let query = ProductQuery::new()
        .limit(3)
        .page(2)
        .sort(ProductSortField::Price, SortDirection::Desc);
    let page = seeded().fetch_products(&query).await.unwrap();

    assert_eq!(page.total_count, 4);
    assert_eq!(page.total_pages, 2);
    assert_eq!(names(&page.items), vec!["Jupe"]);
}

#[tokio::test]
async fn products_search_is_case_insensitive() {
    let page = seeded()
        .fetch_products(&ProductQuery::new().search("ROBE"))
        .await
        .unwrap();
    assert_eq!(names(&page.items), vec!["Robe Fleurie", "Robe Soirée"]);

    // Category matches too
    let page = seeded()
        .fetch_products(&ProductQuery::new().search("haut"))
        .await
        .unwrap();
    assert_eq!(names(&page.items), vec!["Chemise"]);
}

#[tokio::test]
async fn products_stock_below_filter() {
    let query = ProductQuery::new()
        .stock_below(10)
        .sort(ProductSortField::Stock, SortDirection::Asc);
    let page = seeded().fetch_products(&query).await.unwrap();

    assert_eq!(names(&page.items), vec!["Robe Fleurie", "Jupe"]);
}

#[tokio::test]
async fn product_crud() {
    let backend = seeded();
    let mut draft = ProductDraft::new("Foulard", "accessoires", Money::from_major(900));
    draft.stock = 5;

    let created = backend.insert_product(&draft).await.unwrap();
    assert_eq!(created.id, ProductId::from(5));
    assert!(created.created_at.is_some());

    draft.price = Money::from_major(1100);
    let updated = backend.update_product(&created.id, &draft).await.unwrap();
    assert_eq!(updated.price, Money::from_major(1100));
    assert_eq!(updated.created_at, created.created_at);

    backend.delete_product(&created.id).await.unwrap();
    assert_eq!(backend.fetch_product(&created.id).await.unwrap(), None);
    // Deleting again is fine
    backend.delete_product(&created.id).await.unwrap();
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    let draft = ProductDraft::new("X", "bas", Money::from_major(1));
    let err = seeded()
        .update_product(&ProductId::from(99), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::NotFound { table: "products", .. }));
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn orders_newest_first_with_items_joined() {
    let page = seeded().fetch_orders(&OrderQuery::new()).await.unwrap();

    let ids: Vec<&str> = page.items.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
    assert_eq!(page.items[0].items.len(), 1);
    assert_eq!(page.items[0].items[0].product_name(), "Robe Fleurie");
}

#[tokio::test]
async fn orders_filter_by_status_and_search() {
    let backend = seeded();

    let delivered = OrderQuery::new().status_filter("delivered").unwrap();
    let page = backend.fetch_orders(&delivered).await.unwrap();
    assert_eq!(page.total_count, 2);

    let by_id = backend.fetch_orders(&OrderQuery::new().search("2")).await.unwrap();
    assert_eq!(by_id.items.len(), 1);
    assert_eq!(by_id.items[0].customer_name, "Yacine");

    let by_email = backend
        .fetch_orders(&OrderQuery::new().search("SARA@"))
        .await
        .unwrap();
    assert_eq!(by_email.items.len(), 1);
}

#[tokio::test]
async fn orders_date_window_is_half_open() {
    let from = Utc.with_ymd_and_hms(2025, 3, 2, 10, 0, 0).unwrap();
    let before = Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
    let query = OrderQuery::new()
        .created_between(Some(from), Some(before))
        .sort(OrderSortField::TotalAmount, SortDirection::Asc);

    let page = seeded().fetch_orders(&query).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id.as_str(), "2");
}

#[tokio::test]
async fn order_insert_items_and_delete_cascade() {
    let backend = seeded();
    let row = backend
        .insert_order(&NewOrder {
            customer_name: "Lina".into(),
            customer_email: "lina@example.com".into(),
            customer_phone: "0666".into(),
            shipping_address: "Oran".into(),
            total_amount: Money::from_major(2500),
            status: OrderStatus::Pending,
        })
        .await
        .unwrap();
    assert_eq!(row.id.as_str(), "4");

    let items = backend
        .insert_order_items(&[NewOrderItem {
            order_id: row.id.clone(),
            product_id: ProductId::from(2),
            quantity: 1,
            price_each: Money::from_major(2500),
        }])
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(backend.order_items().len(), 4);

    backend.delete_order(&row.id).await.unwrap();
    assert_eq!(backend.orders().len(), 3);
    assert_eq!(backend.order_items().len(), 3);
}

#[tokio::test]
async fn order_items_for_unknown_product_are_rejected_whole() {
    let backend = seeded();
    let items = [
        NewOrderItem {
            order_id: OrderId::from(1),
            product_id: ProductId::from(2),
            quantity: 1,
            price_each: Money::from_major(2500),
        },
        NewOrderItem {
            order_id: OrderId::from(1),
            product_id: ProductId::from(77),
            quantity: 1,
            price_each: Money::from_major(10),
        },
    ];

    let err = backend.insert_order_items(&items).await.unwrap_err();
    assert!(matches!(err, BackendError::Rejected(_)));
    assert_eq!(backend.order_items().len(), 3);
}

#[tokio::test]
async fn update_order_status() {
    let backend = seeded();
    let updated = backend
        .update_order_status(&OrderId::from(2), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Shipped);
    assert_eq!(updated.items.len(), 1);

    let err = backend
        .update_order_status(&OrderId::from(42), OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::NotFound { table: "orders", .. }));
}

// ============================================================================
// Faults
// ============================================================================

#[tokio::test]
async fn injected_read_failure_is_an_error_not_empty() {
    let backend = seeded();
    backend.set_fail_reads(true);

    let err = backend.fetch_products(&ProductQuery::new()).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(backend.fetch_orders(&OrderQuery::new()).await.is_err());

    backend.set_fail_reads(false);
    assert!(backend.fetch_products(&ProductQuery::new()).await.is_ok());
}

#[tokio::test]
async fn injected_item_failure() {
    let backend = seeded();
    backend.set_fail_order_items(true);

    let err = backend
        .insert_order_items(&[NewOrderItem {
            order_id: OrderId::from(1),
            product_id: ProductId::from(2),
            quantity: 1,
            price_each: Money::from_major(2500),
        }])
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Unavailable(_)));
}
