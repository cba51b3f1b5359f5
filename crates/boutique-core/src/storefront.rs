//! Storefront wiring
//!
//! Owns the cart and hands out the services, all sharing one key-value store
//! and one backend.

use crate::checkout::{CheckoutForm, CheckoutService};
use crate::config::BoutiqueConfig;
use crate::error::{BoutiqueError, CheckoutError, ConfigError};
use boutique_admin::{AdminAuth, OrderManager, ProductManager, Statistics};
use boutique_backend::{Backend, BackendError, MemoryBackend, RestBackend};
use boutique_cart::CartStore;
use boutique_catalog::{FetchOutcome, Order, Page, Product, ProductQuery};
use boutique_storage::{FileStore, KeyValueStore};
use std::sync::Arc;

/// Backend named by `config`, or empty in-memory tables when none is set
pub fn connect_backend(config: &BoutiqueConfig) -> Result<Arc<dyn Backend>, BackendError> {
    match config.rest_config() {
        Some(rest) => {
            tracing::info!(url = %rest.base_url, "using hosted backend");
            Ok(Arc::new(RestBackend::new(&rest)?))
        }
        None => {
            tracing::warn!("no backend configured, using in-memory tables");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}

/// Cart plus services over a shared store and backend
pub struct Storefront<S> {
    config: BoutiqueConfig,
    store: Arc<S>,
    backend: Arc<dyn Backend>,
    cart: CartStore<Arc<S>>,
    checkout: CheckoutService,
}

impl Storefront<FileStore> {
    /// Open the file store under `config.data_dir` and connect the backend
    pub fn open(config: BoutiqueConfig) -> Result<Self, BoutiqueError> {
        config.validate()?;
        let store = FileStore::open(config.data_dir.clone())?;
        let backend = connect_backend(&config)?;
        Ok(Self::new(config, store, backend))
    }
}

impl<S: KeyValueStore> Storefront<S> {
    /// Wire services over `store` and `backend`, hydrating the cart
    pub fn new(config: BoutiqueConfig, store: S, backend: Arc<dyn Backend>) -> Self {
        let store = Arc::new(store);
        let cart = CartStore::open(Arc::clone(&store));
        tracing::debug!(lines = cart.lines().len(), "storefront opened");
        Self {
            config,
            store,
            checkout: CheckoutService::new(Arc::clone(&backend)),
            backend,
            cart,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &BoutiqueConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    #[inline]
    #[must_use]
    pub fn cart(&self) -> &CartStore<Arc<S>> {
        &self.cart
    }

    #[inline]
    pub fn cart_mut(&mut self) -> &mut CartStore<Arc<S>> {
        &mut self.cart
    }

    /// Catalog query preset with the configured page size
    #[must_use]
    pub fn product_query(&self) -> ProductQuery {
        ProductQuery::new().limit(self.config.page_size)
    }

    /// One page of the catalog
    pub async fn browse(&self, query: &ProductQuery) -> FetchOutcome<Page<Product>, BackendError> {
        FetchOutcome::from_page(self.backend.fetch_products(query).await)
    }

    /// Submit the cart as an order
    pub async fn checkout(&mut self, form: &CheckoutForm) -> Result<Order, CheckoutError> {
        self.checkout.submit(form, &mut self.cart).await
    }

    /// Admin session gate over the shared store
    pub fn admin_auth(&self) -> Result<AdminAuth<Arc<S>>, ConfigError> {
        let credentials = self.config.admin_credentials()?;
        Ok(AdminAuth::new(Arc::clone(&self.store), credentials)
            .with_timeout_secs(self.config.session_timeout_secs))
    }

    #[must_use]
    pub fn products(&self) -> ProductManager {
        ProductManager::new(Arc::clone(&self.backend))
            .with_low_stock_threshold(self.config.low_stock_threshold)
    }

    #[must_use]
    pub fn orders(&self) -> OrderManager {
        OrderManager::new(Arc::clone(&self.backend))
    }

    #[must_use]
    pub fn statistics(&self) -> Statistics {
        Statistics::new(Arc::clone(&self.backend))
            .with_low_stock_threshold(self.config.low_stock_threshold)
    }
}
