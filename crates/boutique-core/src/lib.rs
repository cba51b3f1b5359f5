//! Boutique Core
//!
//! Configuration, checkout and the [`Storefront`] that wires the cart, the
//! admin services and a backend together.
//!
//! # Example
//!
//! ```rust
//! use boutique_backend::MemoryBackend;
//! use boutique_core::{BoutiqueConfig, Storefront};
//! use boutique_catalog::{Money, Product};
//! use boutique_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let mut shop = Storefront::new(BoutiqueConfig::new(), MemoryStore::new(), backend);
//!
//! shop.cart_mut().add_one(&Product::new(1, "Robe", Money::from_major(1000)));
//! assert_eq!(shop.cart().total(), Money::from_major(1000));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod checkout;
pub mod config;
mod error;
mod storefront;

pub use checkout::{CheckoutForm, CheckoutService};
pub use config::BoutiqueConfig;
pub use error::{BoutiqueError, CheckoutError, ConfigError};
pub use storefront::{connect_backend, Storefront};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for storefront code
    pub use crate::{BoutiqueConfig, BoutiqueError, CheckoutForm, Storefront};
    pub use boutique_cart::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
