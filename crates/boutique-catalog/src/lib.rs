//! Boutique Catalog
//!
//! Typed records exchanged with the hosted table store.
//!
//! # Core Concepts
//!
//! - [`Money`]: exact amounts in minor currency units
//! - [`Product`] / [`ProductDraft`]: catalog rows and validated write payloads
//! - [`Order`] / [`NewOrder`]: order rows and checkout inserts
//! - [`ProductQuery`] / [`OrderQuery`]: filter, sort and range pagination
//! - [`Page`]: one page of rows plus the exact total count
//! - [`FetchOutcome`]: distinguishes "no rows" from "fetch failed"
//!
//! # Example
//!
//! ```rust
//! use boutique_catalog::{Money, Product};
//!
//! let product = Product::new("12", "Robe Fleurie", Money::from_major(4500))
//!     .with_size("M")
//!     .with_color("Rose");
//! assert_eq!(product.price.major(), 4500);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod ids;
mod locale;
mod money;
mod order;
mod outcome;
mod product;
mod query;

pub use error::{FieldError, ParseError, ValidationError};
pub use ids::{OrderId, OrderItemId, ProductId};
pub use locale::Locale;
pub use money::Money;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderItemProduct, OrderStatus};
pub use outcome::FetchOutcome;
pub use product::{Product, ProductDraft, ProductStatus};
pub use query::{
    OrderQuery, OrderSortField, Page, ProductQuery, ProductSortField, RowRange, SortDirection,
};

/// Stock level below which a product counts as low stock
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
