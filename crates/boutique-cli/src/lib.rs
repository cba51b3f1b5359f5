//! Boutique CLI
//!
//! The `boutique` command: cart editing against the file store, catalog
//! browsing, checkout, and back-office commands behind an admin session.
//!
//! Without a configured backend URL and key the commands run against empty
//! in-memory tables.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cli;
mod commands;

pub use cli::build_cli;
pub use commands::{init_tracing, load_config, run};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
