//! Boutique Storage
//!
//! Persistent key-value bridge for client-side state.
//!
//! # Core Concepts
//!
//! - [`KeyValueStore`]: synchronous string slots addressed by a fixed name
//! - [`MemoryStore`]: in-process store, used as the test fake
//! - [`FileStore`]: one file per slot under a data directory
//! - [`StorageBridge`]: fail-soft wrapper; loads yield "absent" and saves are
//!   swallowed when the underlying store errors
//!
//! # Example
//!
//! ```rust
//! use boutique_storage::{MemoryStore, StorageBridge};
//!
//! let bridge = StorageBridge::new(MemoryStore::new());
//! bridge.save("greeting", "hello");
//! assert_eq!(bridge.load("greeting").as_deref(), Some("hello"));
//! assert_eq!(bridge.load("missing"), None);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bridge;
mod error;
mod file;
mod store;

pub use bridge::StorageBridge;
pub use error::StorageError;
pub use file::FileStore;
pub use store::{KeyValueStore, MemoryStore};

/// Slot holding the serialized cart snapshot
pub const CART_SLOT: &str = "blossom-cart";

/// Slot holding the admin session
pub const ADMIN_SESSION_SLOT: &str = "adminSession";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
