//! Error types for the storefront services

use boutique_admin::{AdminError, AuthError};
use boutique_backend::BackendError;
use boutique_cart::CartError;
use boutique_catalog::ValidationError;
use boutique_storage::StorageError;
use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing config value: {0}")]
    Missing(&'static str),

    #[error("invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Create invalid-value error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Checkout errors
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Order row could not be created
    #[error("order insert failed: {0}")]
    OrderInsert(#[source] BackendError),

    /// Item rows failed; the order row was rolled back when possible
    #[error("order items insert failed: {source}")]
    ItemsInsert {
        #[source]
        source: BackendError,
        /// Whether the orphaned order row was deleted
        rolled_back: bool,
    },
}

impl CheckoutError {
    /// Check if submitting the same form again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::OrderInsert(e) | Self::ItemsInsert { source: e, .. } => e.is_retryable(),
            Self::EmptyCart | Self::Validation(_) => false,
        }
    }

    /// Backend failure behind this error, if any
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::OrderInsert(e) | Self::ItemsInsert { source: e, .. } => Some(e),
            Self::EmptyCart | Self::Validation(_) => None,
        }
    }
}

/// Top-level error for storefront wiring
#[derive(Debug, thiserror::Error)]
pub enum BoutiqueError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("admin error: {0}")]
    Admin(#[from] AdminError),

    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

impl BoutiqueError {
    /// Check if retrying could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.is_retryable(),
            Self::Admin(e) => e.is_retryable(),
            Self::Checkout(e) => e.is_retryable(),
            Self::Storage(StorageError::Unavailable(_) | StorageError::Io { .. }) => true,
            Self::Config(_) | Self::Storage(_) | Self::Cart(_) | Self::Auth(_) => false,
        }
    }
}
