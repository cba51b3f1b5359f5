//! Product management

use crate::error::AdminError;
use boutique_backend::{Backend, BackendError};
use boutique_catalog::{
    FetchOutcome, Page, Product, ProductDraft, ProductId, ProductQuery, ProductSortField,
    SortDirection, LOW_STOCK_THRESHOLD,
};
use std::sync::Arc;

/// Catalog administration over a [`Backend`]
#[derive(Clone)]
pub struct ProductManager {
    backend: Arc<dyn Backend>,
    low_stock_threshold: u32,
}

impl ProductManager {
    /// Create manager with the default low-stock threshold
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

    /// Current threshold
    #[inline]
    #[must_use]
    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    /// One page of the catalog
    pub async fn list(&self, query: &ProductQuery) -> FetchOutcome<Page<Product>, BackendError> {
        FetchOutcome::from_page(self.backend.fetch_products(query).await)
    }

    /// Single product
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, AdminError> {
        Ok(self.backend.fetch_product(id).await?)
    }

    /// Validate and insert a product
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, AdminError> {
        draft.validate()?;
        let product = self.backend.insert_product(draft).await?;
        tracing::info!(id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Validate and overwrite a product
    pub async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, AdminError> {
        draft.validate()?;
        let product = self.backend.update_product(id, draft).await?;
        tracing::info!(id = %product.id, "product updated");
        Ok(product)
    }

    /// Delete a product
    pub async fn delete(&self, id: &ProductId) -> Result<(), AdminError> {
        self.backend.delete_product(id).await?;
        tracing::info!(id = %id, "product deleted");
        Ok(())
    }

    /// Products under the low-stock threshold, scarcest first
    pub async fn low_stock(&self, limit: u32) -> FetchOutcome<Vec<Product>, BackendError> {
        let query = ProductQuery::new()
            .stock_below(self.low_stock_threshold)
            .sort(ProductSortField::Stock, SortDirection::Asc)
            .limit(limit);
        FetchOutcome::from_rows(self.backend.fetch_products(&query).await.map(|p| p.items))
    }
}
