//! Table store access trait

use crate::error::BackendError;
use boutique_catalog::{
    NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderQuery, OrderStatus, Page, Product,
    ProductDraft, ProductId, ProductQuery,
};
use std::sync::Arc;

/// Hosted table store
///
/// Tables are `products`, `orders` and `order_items`. Implementations must
/// not fabricate rows: an empty result is an empty result, a failure is an
/// error.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// One page of products matching `query`, with the exact total
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Page<Product>, BackendError>;

    /// Single product by id
    async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, BackendError>;

    /// Insert a product and return the stored row
    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, BackendError>;

    /// Overwrite a product's editable fields
    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, BackendError>;

    /// Delete a product; deleting a missing row succeeds
    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError>;

    /// One page of orders matching `query`, items and product names joined
    async fn fetch_orders(&self, query: &OrderQuery) -> Result<Page<Order>, BackendError>;

    /// Every order item, with product names joined
    async fn fetch_order_items(&self) -> Result<Vec<OrderItem>, BackendError>;

    /// Insert an order and return the stored row
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, BackendError>;

    /// Insert items for an existing order in one request
    async fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, BackendError>;

    /// Delete an order and its items; deleting a missing row succeeds
    async fn delete_order(&self, id: &OrderId) -> Result<(), BackendError>;

    /// Set an order's status and return the updated row
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError>;
}

#[async_trait::async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Page<Product>, BackendError> {
        (**self).fetch_products(query).await
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        (**self).fetch_product(id).await
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, BackendError> {
        (**self).insert_product(draft).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, BackendError> {
        (**self).update_product(id, draft).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        (**self).delete_product(id).await
    }

    async fn fetch_orders(&self, query: &OrderQuery) -> Result<Page<Order>, BackendError> {
        (**self).fetch_orders(query).await
    }

    async fn fetch_order_items(&self) -> Result<Vec<OrderItem>, BackendError> {
        (**self).fetch_order_items().await
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, BackendError> {
        (**self).insert_order(order).await
    }

    async fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, BackendError> {
        (**self).insert_order_items(items).await
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), BackendError> {
        (**self).delete_order(id).await
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError> {
        (**self).update_order_status(id, status).await
    }
}
