//! Boutique Cart
//!
//! Client-side shopping cart with deterministic merge semantics.
//!
//! # Core Concepts
//!
//! - [`CartKey`]: `(product id, size, color)` identity of a cart line
//! - [`CartLine`]: point-in-time snapshot of a product plus a quantity
//! - [`CartState`]: ordered, key-unique lines and the pure [`CartAction`] reducer
//! - [`CartStore`]: owns the state, applies one action at a time, and saves
//!   the result through a fail-soft [`StorageBridge`](boutique_storage::StorageBridge)
//!
//! # Example
//!
//! ```rust
//! use boutique_cart::{CartStore, Quantity};
//! use boutique_catalog::{Money, Product};
//! use boutique_storage::MemoryStore;
//!
//! let mut cart = CartStore::open(MemoryStore::new());
//! let robe = Product::new(1, "Robe", Money::from_major(1000));
//!
//! let key = cart.add(&robe, Quantity::ONE, Some("M"), Some("Red"));
//! cart.add(&robe, Quantity::new(2).unwrap(), Some("M"), Some("Red"));
//!
//! assert_eq!(cart.get(&key).map(|l| l.quantity.get()), Some(3));
//! assert_eq!(cart.total(), Money::from_major(3000));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod key;
mod line;
mod quantity;
mod state;
mod store;

pub use error::CartError;
pub use key::{CartKey, DEFAULT_VARIANT};
pub use line::CartLine;
pub use quantity::Quantity;
pub use state::{CartAction, CartState};
pub use store::CartStore;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the cart
    pub use crate::{CartKey, CartLine, CartState, CartStore, Quantity};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
