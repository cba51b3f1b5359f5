//! Boutique Backend
//!
//! Access to the hosted table store holding products, orders and order
//! items.
//!
//! # Core Concepts
//!
//! - [`Backend`]: async trait over the three tables, injected into services
//! - [`MemoryBackend`]: in-process tables with the same query semantics and
//!   switchable faults
//! - [`RestBackend`]: PostgREST dialect over `reqwest`
//!
//! # Example
//!
//! ```rust
//! use boutique_backend::{Backend, MemoryBackend};
//! use boutique_catalog::{Money, Product, ProductQuery};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = MemoryBackend::new()
//!     .with_products([Product::new(1, "Robe", Money::from_major(4500))]);
//! let page = backend.fetch_products(&ProductQuery::new()).await.unwrap();
//! assert_eq!(page.total_count, 1);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod backend;
mod error;
mod memory;
pub mod rest;

pub use backend::Backend;
pub use error::BackendError;
pub use memory::MemoryBackend;
pub use rest::{RestBackend, RestConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
