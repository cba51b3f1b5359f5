//! PostgREST backend over HTTPS
//!
//! Talks to the hosted `/rest/v1/<table>` endpoints. Listings ask for an
//! exact count with `Prefer: count=exact` and read it back from
//! `Content-Range`; writes ask for the stored row with
//! `Prefer: return=representation`.

mod params;

pub use params::{
    eq_filter, order_column, order_params, parse_content_range, product_params, QueryPairs,
    ORDER_ITEM_SELECT, ORDER_SELECT,
};

use crate::backend::Backend;
use crate::error::BackendError;
use boutique_catalog::{
    NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderQuery, OrderStatus, Page, Product,
    ProductDraft, ProductId, ProductQuery,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PRODUCTS: &str = "products";
const ORDERS: &str = "orders";
const ORDER_ITEMS: &str = "order_items";

/// Connection settings for the hosted store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestConfig {
    /// Project URL, without the `/rest/v1` suffix
    pub base_url: String,
    /// Public API key, sent as `apikey` and as the bearer token
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl RestConfig {
    /// Create config with the default timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Backend speaking the PostgREST dialect
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    /// Build a client with the key headers preset
    pub fn new(config: &RestConfig) -> Result<Self, BackendError> {
        let base_url = config.base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(BackendError::NotConfigured("backend URL is empty".into()));
        }
        if config.api_key.trim().is_empty() {
            return Err(BackendError::NotConfigured("API key is empty".into()));
        }

        let invalid_key =
            |_| BackendError::NotConfigured("API key is not a valid header value".into());
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&config.api_key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(invalid_key)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Project URL requests are sent to
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{table}", self.base_url))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "backend request failed");
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, BackendError> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn page<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        limit: u32,
    ) -> Result<Page<T>, BackendError> {
        let response = self.send(request.header("Prefer", "count=exact")).await?;
        let counted = match response.headers().get(CONTENT_RANGE) {
            Some(value) => {
                let text = value
                    .to_str()
                    .map_err(|_| BackendError::ContentRange(format!("{value:?}")))?;
                parse_content_range(text)?
            }
            None => None,
        };
        let bytes = response.bytes().await?;
        let items: Vec<T> = serde_json::from_slice(&bytes)?;
        let total = counted.unwrap_or(items.len() as u64);
        Ok(Page::new(items, total, limit))
    }

    async fn returning<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        table: &'static str,
        id: &str,
    ) -> Result<T, BackendError> {
        let rows: Vec<T> = self
            .rows(request.header("Prefer", "return=representation"))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::not_found(table, id))
    }
}

#[async_trait::async_trait]
impl Backend for RestBackend {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Page<Product>, BackendError> {
        let request = self
            .table(Method::GET, PRODUCTS)
            .query(&product_params(query));
        self.page(request, query.limit).await
    }

    async fn fetch_product(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        let request = self
            .table(Method::GET, PRODUCTS)
            .query(&[("select", "*")])
            .query(&[eq_filter("id", id)]);
        let rows: Vec<Product> = self.rows(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, BackendError> {
        let request = self
            .table(Method::POST, PRODUCTS)
            .json(&[draft]);
        let product: Product = self.returning(request, PRODUCTS, "new").await?;
        tracing::debug!(id = %product.id, "product inserted");
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, BackendError> {
        let request = self
            .table(Method::PATCH, PRODUCTS)
            .query(&[eq_filter("id", id)])
            .json(draft);
        self.returning(request, PRODUCTS, id.as_str()).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        let request = self
            .table(Method::DELETE, PRODUCTS)
            .query(&[eq_filter("id", id)]);
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_orders(&self, query: &OrderQuery) -> Result<Page<Order>, BackendError> {
        let request = self.table(Method::GET, ORDERS).query(&order_params(query));
        self.page(request, query.limit).await
    }

    async fn fetch_order_items(&self) -> Result<Vec<OrderItem>, BackendError> {
        let request = self
            .table(Method::GET, ORDER_ITEMS)
            .query(&[("select", ORDER_ITEM_SELECT)]);
        self.rows(request).await
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order, BackendError> {
        let request = self.table(Method::POST, ORDERS).json(&[order]);
        self.returning(request, ORDERS, "new").await
    }

    async fn insert_order_items(
        &self,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>, BackendError> {
        let request = self
            .table(Method::POST, ORDER_ITEMS)
            .header("Prefer", "return=representation")
            .json(items);
        self.rows(request).await
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), BackendError> {
        let request = self
            .table(Method::DELETE, ORDERS)
            .query(&[eq_filter("order_id", id)]);
        self.send(request).await?;
        Ok(())
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError> {
        let request = self
            .table(Method::PATCH, ORDERS)
            .query(&[eq_filter("order_id", id)])
            .json(&serde_json::json!({ "status": status }));
        self.returning(request, ORDERS, id.as_str()).await
    }
}
