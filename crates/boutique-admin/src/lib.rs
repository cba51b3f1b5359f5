//! Boutique Admin
//!
//! Back-office services for the shop owner.
//!
//! # Core Concepts
//!
//! - [`AdminAuth`]: single-credential login with a sliding 30-minute session
//! - [`ProductManager`]: validated catalog writes and low-stock listing
//! - [`OrderManager`]: order list, status changes and CSV export
//! - [`Statistics`]: dashboard numbers, monthly revenue and best sellers
//!
//! Every read that feeds a screen returns a
//! [`FetchOutcome`](boutique_catalog::FetchOutcome), so an empty shop and
//! an unreachable backend stay distinguishable.
//!
//! # Example
//!
//! ```rust
//! use boutique_admin::{AdminAuth, AdminCredentials};
//! use boutique_storage::MemoryStore;
//!
//! let creds = AdminCredentials::from_password("owner@boutique.dz", "s3cret");
//! let auth = AdminAuth::new(MemoryStore::new(), creds);
//!
//! assert!(auth.login("owner@boutique.dz", "wrong").is_err());
//! let user = auth.login("owner@boutique.dz", "s3cret").unwrap();
//! assert_eq!(auth.check_session(), Some(user));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod auth;
mod error;
mod orders;
mod products;
mod stats;

pub use auth::{
    password_digest, AdminAuth, AdminCredentials, AdminSession, AdminUser, ADMIN_ROLE,
    DEFAULT_SESSION_TIMEOUT_SECS,
};
pub use error::{AdminError, AuthError};
pub use orders::{export_csv, DateFilter, OrderExportRow, OrderManager, EXPORT_LIMIT};
pub use products::ProductManager;
pub use stats::{
    growth_percent, month_start, monthly_revenue, summarize, top_products, DashboardStats,
    MonthlyRevenue, Statistics, TopProduct,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for back-office services
    pub use crate::{
        AdminAuth, AdminCredentials, AdminError, AuthError, OrderManager, ProductManager,
        Statistics,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
