//! Single-owner cart store
//!
//! The store is the only writer of cart state. Every mutation goes through
//! [`CartStore::dispatch`], which runs the reducer and then saves the full
//! snapshot. A failed save is logged by the bridge and the in-memory state
//! stays authoritative.

use crate::key::CartKey;
use crate::line::CartLine;
use crate::quantity::Quantity;
use crate::state::{CartAction, CartState};
use boutique_catalog::{Money, Product};
use boutique_storage::{KeyValueStore, StorageBridge, CART_SLOT};
use chrono::Utc;

/// Cart state owner with best-effort persistence
#[derive(Debug)]
pub struct CartStore<S> {
    bridge: StorageBridge<S>,
    slot: String,
    state: CartState,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart saved in the default slot
    pub fn open(store: S) -> Self {
        Self::with_slot(store, CART_SLOT)
    }

    /// Open the cart saved in `slot`
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart.
    pub fn with_slot(store: S, slot: impl Into<String>) -> Self {
        let bridge = StorageBridge::new(store);
        let slot = slot.into();
        let state = bridge.load_json::<CartState>(&slot).unwrap_or_default();
        tracing::debug!(
            slot = %slot,
            lines = state.len(),
            "cart hydrated"
        );
        Self { bridge, slot, state }
    }

    /// Add `quantity` of `product` in the given variant
    ///
    /// Returns the key of the line that now holds the product.
    pub fn add(
        &mut self,
        product: &Product,
        quantity: Quantity,
        size: Option<&str>,
        color: Option<&str>,
    ) -> CartKey {
        let line = CartLine::from_product(product, quantity, size, color, Utc::now());
        let key = line.key().clone();
        tracing::debug!(key = %key, quantity = quantity.get(), "cart add");
        self.dispatch(CartAction::Add(line));
        key
    }

    /// Add one unit of `product` with its default variant
    pub fn add_one(&mut self, product: &Product) -> CartKey {
        self.add(product, Quantity::ONE, None, None)
    }

    /// Remove the line with `key`; absent keys are ignored
    pub fn remove(&mut self, key: &CartKey) {
        self.dispatch(CartAction::Remove(key.clone()));
    }

    /// Replace a line's quantity; zero or below removes it
    pub fn set_quantity(&mut self, key: &CartKey, quantity: i64) {
        self.dispatch(CartAction::SetQuantity {
            key: key.clone(),
            quantity,
        });
    }

    /// Drop every line
    pub fn clear(&mut self) {
        self.dispatch(CartAction::Clear);
    }

    /// Apply one action and save the result
    pub fn dispatch(&mut self, action: CartAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
        self.persist();
    }

    fn persist(&self) {
        if !self.bridge.save_json(&self.slot, &self.state) {
            tracing::debug!(slot = %self.slot, "cart kept in memory only");
        }
    }

    /// Sum of unit price times quantity
    #[inline]
    #[must_use]
    pub fn total(&self) -> Money {
        self.state.total()
    }

    /// Sum of quantities
    #[inline]
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Copy of the current state
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.clone()
    }

    /// Lines in insertion order
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&CartLine> {
        self.state.get(key)
    }

    /// Slot this cart saves to
    #[inline]
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Persistence bridge
    #[inline]
    #[must_use]
    pub fn bridge(&self) -> &StorageBridge<S> {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boutique_storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn store_persists_after_each_mutation() {
        let mut cart = CartStore::open(MemoryStore::new());
        let p = Product::new(1, "Robe", Money::from_major(1000));

        cart.add_one(&p);
        let saved = cart.bridge().load(CART_SLOT).unwrap();
        assert!(saved.contains("\"cartItemId\":\"1-default-default\""));

        cart.clear();
        let saved = cart.bridge().load_json::<CartState>(CART_SLOT).unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn store_uses_custom_slot() {
        let mut cart = CartStore::with_slot(MemoryStore::new(), "other-cart");
        cart.add_one(&Product::new(1, "Robe", Money::from_major(10)));

        assert_eq!(cart.slot(), "other-cart");
        assert!(cart.bridge().load("other-cart").is_some());
        assert_eq!(cart.bridge().load(CART_SLOT), None);
    }

    #[test]
    fn add_returns_resolved_key() {
        let mut cart = CartStore::open(MemoryStore::new());
        let p = Product::new(5, "Veste", Money::from_major(10)).with_size("L");

        let key = cart.add(&p, Quantity::ONE, None, Some("Noir"));
        assert_eq!(key.to_string(), "5-L-Noir");
        assert!(cart.get(&key).is_some());
    }
}
