//! Error types for the cart

/// Cart errors
///
/// Mutations on [`CartStore`](crate::CartStore) never fail; these come from
/// validating caller input before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// Quantity is zero or negative
    #[error("invalid quantity {0}: must be at least 1")]
    InvalidQuantity(i64),
}
