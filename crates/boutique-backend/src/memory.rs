//! In-process table store
//!
//! Honors the same filter, sort and range semantics as the hosted store so
//! services can be tested without a network. Faults can be switched on per
//! operation to exercise error paths.

use crate::backend::Backend;
use crate::error::BackendError;
use boutique_catalog::{
    NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderItemProduct, OrderQuery,
    OrderSortField, OrderStatus, Page, Product, ProductDraft, ProductId, ProductQuery,
    ProductSortField, RowRange, SortDirection,
};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::cmp::Ordering;

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    /// Stored without items; items live in `items` and are joined on read
    orders: Vec<Order>,
    items: Vec<OrderItem>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Faults {
    reads: bool,
    order_insert: bool,
    order_items: bool,
    order_delete: bool,
}

/// Table store held in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
    faults: Mutex<Faults>,
}

impl MemoryBackend {
    /// Create empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With products seeded into the `products` table
    #[must_use]
    pub fn with_products(self, products: impl IntoIterator<Item = Product>) -> Self {
        self.tables.write().products.extend(products);
        self
    }

    /// With orders seeded; embedded items go to the `order_items` table
    #[must_use]
    pub fn with_orders(self, orders: impl IntoIterator<Item = Order>) -> Self {
        {
            let mut tables = self.tables.write();
            for mut order in orders {
                for mut item in std::mem::take(&mut order.items) {
                    item.order_id = Some(order.id.clone());
                    tables.items.push(item);
                }
                tables.orders.push(order);
            }
        }
        self
    }

    /// Make every read fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.faults.lock().reads = fail;
    }

    /// Make order inserts fail
    pub fn set_fail_order_insert(&self, fail: bool) {
        self.faults.lock().order_insert = fail;
    }

    /// Make order-item inserts fail
    pub fn set_fail_order_items(&self, fail: bool) {
        self.faults.lock().order_items = fail;
    }

    /// Make order deletes fail
    pub fn set_fail_order_delete(&self, fail: bool) {
        self.faults.lock().order_delete = fail;
    }

    /// Copy of the `products` table
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.tables.read().products.clone()
    }

    /// Copy of the `orders` table with items joined
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        let tables = self.tables.read();
        tables.orders.iter().map(|o| joined_order(&tables, o)).collect()
    }

    /// Copy of the `order_items` table
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.tables.read().items.clone()
    }

    fn check(&self, injected: impl FnOnce(&Faults) -> bool, what: &str) -> Result<(), BackendError> {
        let faults = *self.faults.lock();
        if injected(&faults) {
            tracing::debug!(operation = what, "injected backend fault");
            return Err(BackendError::Unavailable(format!("{what} failed")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Page<Product>, BackendError> {
        self.check(|f| f.reads, "fetch products")?;
        let tables = self.tables.read();
        let mut rows: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| product_matches(p, query))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            directed(compare_products(a, b, query.sort_by), query.direction)
                .then_with(|| compare_ids(a.id.as_str(), b.id.as_str()))
        });
        Ok(paginate(rows, query.range(), query.limit))
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        self.check(|f| f.reads, "fetch product")?;
        Ok(self
            .tables
            .read()
            .products
            .iter()
            .find(|p| p.id == *id)
            .cloned())
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, BackendError> {
        let mut tables = self.tables.write();
        let id = ProductId::from(next_id(tables.products.iter().map(|p| p.id.as_str())));
        let mut product = Product::new(id, String::new(), draft.price);
        apply_draft(&mut product, draft);
        product.created_at = Some(Utc::now());
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, BackendError> {
        let mut tables = self.tables.write();
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| BackendError::not_found("products", id))?;
        apply_draft(product, draft);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        self.tables.write().products.retain(|p| p.id != *id);
        Ok(())
    }

    async fn fetch_orders(&self, query: &OrderQuery) -> Result<Page<Order>, BackendError> {
        self.check(|f| f.reads, "fetch orders")?;
        let tables = self.tables.read();
        let mut rows: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| order_matches(o, query))
            .map(|o| joined_order(&tables, o))
            .collect();
        rows.sort_by(|a, b| {
            directed(compare_orders(a, b, query.sort_by), query.direction)
                .then_with(|| compare_ids(a.id.as_str(), b.id.as_str()))
        });
        Ok(paginate(rows, query.range(), query.limit))
    }

    async fn fetch_order_items(&self) -> Result<Vec<OrderItem>, BackendError> {
        self.check(|f| f.reads, "fetch order items")?;
        let tables = self.tables.read();
        Ok(tables.items.iter().map(|i| joined_item(&tables, i)).collect())
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, BackendError> {
        self.check(|f| f.order_insert, "insert order")?;
        let mut tables = self.tables.write();
        let id = OrderId::from(next_id(tables.orders.iter().map(|o| o.id.as_str())));
        let row = Order {
            id,
            customer_name: order.customer_name.clone(),
            customer_email: order.customer_email.clone(),
            customer_phone: order.customer_phone.clone(),
            shipping_address: order.shipping_address.clone(),
            created_at: Utc::now(),
            status: order.status,
            total_amount: order.total_amount,
            items: Vec::new(),
        };
        tables.orders.push(row.clone());
        Ok(row)
    }

    async fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, BackendError> {
        self.check(|f| f.order_items, "insert order items")?;
        let mut tables = self.tables.write();

        // All rows are checked before any is written
        for item in items {
            if item.quantity == 0 {
                return Err(BackendError::Rejected(format!(
                    "order item for product {} has zero quantity",
                    item.product_id
                )));
            }
            if !tables.orders.iter().any(|o| o.id == item.order_id) {
                return Err(BackendError::Rejected(format!(
                    "order {} does not exist",
                    item.order_id
                )));
            }
            if !tables.products.iter().any(|p| p.id == item.product_id) {
                return Err(BackendError::Rejected(format!(
                    "product {} does not exist",
                    item.product_id
                )));
            }
        }

        let mut next = next_id(tables.items.iter().map(|i| i.id.as_str()));
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = OrderItem {
                id: OrderItemId::from(next),
                order_id: Some(item.order_id.clone()),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                price_each: item.price_each,
                product: None,
            };
            next += 1;
            tables.items.push(row.clone());
            inserted.push(row);
        }
        Ok(inserted)
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), BackendError> {
        self.check(|f| f.order_delete, "delete order")?;
        let mut tables = self.tables.write();
        tables.orders.retain(|o| o.id != *id);
        tables.items.retain(|i| i.order_id.as_ref() != Some(id));
        Ok(())
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError> {
        let mut tables = self.tables.write();
        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == *id)
            .ok_or_else(|| BackendError::not_found("orders", id))?;
        order.status = status;
        let order = order.clone();
        Ok(joined_order(&tables, &order))
    }
}

fn apply_draft(product: &mut Product, draft: &ProductDraft) {
    product.name.clone_from(&draft.name);
    product.name_fr.clone_from(&draft.name_fr);
    product.name_ar.clone_from(&draft.name_ar);
    product.description.clone_from(&draft.description);
    product.description_ar.clone_from(&draft.description_ar);
    product.category.clone_from(&draft.category);
    product.price = draft.price;
    product.main_image_url.clone_from(&draft.main_image_url);
    product.images.clone_from(&draft.images);
    product.sizes.clone_from(&draft.sizes);
    product.colors.clone_from(&draft.colors);
    product.stock = draft.stock;
    product.status = draft.status;
}

fn joined_item(tables: &Tables, item: &OrderItem) -> OrderItem {
    let mut item = item.clone();
    if let Some(p) = tables.products.iter().find(|p| p.id == item.product_id) {
        item.product = Some(OrderItemProduct {
            name: p.name.clone(),
            main_image_url: p.main_image_url.clone(),
        });
    }
    item
}

fn joined_order(tables: &Tables, order: &Order) -> Order {
    let mut order = order.clone();
    order.items = tables
        .items
        .iter()
        .filter(|i| i.order_id.as_ref() == Some(&order.id))
        .map(|i| joined_item(tables, i))
        .collect();
    order
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn product_matches(product: &Product, query: &ProductQuery) -> bool {
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let hit = contains_ci(&product.name, &needle)
            || contains_ci(&product.category, &needle)
            || product
                .name_ar
                .as_deref()
                .is_some_and(|n| contains_ci(n, &needle));
        if !hit {
            return false;
        }
    }
    if query.category.as_ref().is_some_and(|c| *c != product.category) {
        return false;
    }
    if query.status.is_some_and(|s| s != product.status) {
        return false;
    }
    if query.stock_below.is_some_and(|t| product.stock >= t) {
        return false;
    }
    true
}

fn order_matches(order: &Order, query: &OrderQuery) -> bool {
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let hit = order.id.as_str() == search.trim()
            || contains_ci(&order.customer_name, &needle)
            || contains_ci(&order.customer_email, &needle);
        if !hit {
            return false;
        }
    }
    if query.status.is_some_and(|s| s != order.status) {
        return false;
    }
    if query.created_from.is_some_and(|from| order.created_at < from) {
        return false;
    }
    if query.created_before.is_some_and(|before| order.created_at >= before) {
        return false;
    }
    true
}

fn compare_products(a: &Product, b: &Product, field: ProductSortField) -> Ordering {
    match field {
        ProductSortField::Id => compare_ids(a.id.as_str(), b.id.as_str()),
        ProductSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProductSortField::Price => a.price.cmp(&b.price),
        ProductSortField::Stock => a.stock.cmp(&b.stock),
        ProductSortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn compare_orders(a: &Order, b: &Order, field: OrderSortField) -> Ordering {
    match field {
        OrderSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        OrderSortField::TotalAmount => a.total_amount.cmp(&b.total_amount),
        OrderSortField::Status => a.status.as_str().cmp(b.status.as_str()),
        OrderSortField::CustomerName => a
            .customer_name
            .to_lowercase()
            .cmp(&b.customer_name.to_lowercase()),
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Numeric ids compare as numbers, anything else as text
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

fn next_id<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(|id| id.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

fn paginate<T>(rows: Vec<T>, range: RowRange, limit: u32) -> Page<T> {
    let total = rows.len() as u64;
    let skip = usize::try_from(range.from).unwrap_or(usize::MAX);
    let take = usize::try_from(range.len()).unwrap_or(usize::MAX);
    let items = rows.into_iter().skip(skip).take(take).collect();
    Page::new(items, total, limit)
}
