//! Cart state and its reducer

use crate::key::CartKey;
use crate::line::CartLine;
use crate::quantity::Quantity;
use boutique_catalog::Money;
use serde::{Deserialize, Serialize};

/// A single cart mutation
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Merge `line` into the cart: bump the quantity of an existing line with
    /// the same key, or append it
    Add(CartLine),
    /// Drop the line with this key, if present
    Remove(CartKey),
    /// Replace a line's quantity; zero or below removes it
    SetQuantity { key: CartKey, quantity: i64 },
    /// Drop every line
    Clear,
}

/// Ordered, key-unique collection of cart lines
///
/// Lines keep insertion order. Totals are derived on every call and never
/// stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CartSnapshot", into = "CartSnapshot")]
pub struct CartState {
    items: Vec<CartLine>,
}

impl CartState {
    /// Empty cart
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `action`, producing the next state
    ///
    /// Pure: `self` is consumed and the returned value is the complete new
    /// state.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add(line) => {
                match self.items.iter_mut().find(|l| l.key() == line.key()) {
                    Some(existing) => {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                    None => self.items.push(line),
                }
            }
            CartAction::Remove(key) => {
                self.items.retain(|l| *l.key() != key);
            }
            CartAction::SetQuantity { key, quantity } => match Quantity::try_from(quantity) {
                Ok(q) => {
                    if let Some(line) = self.items.iter_mut().find(|l| *l.key() == key) {
                        line.quantity = q;
                    }
                }
                Err(_) => self.items.retain(|l| *l.key() != key),
            },
            CartAction::Clear => self.items.clear(),
        }
        self
    }

    /// Apply `action` to a copy, leaving `self` untouched
    #[must_use]
    pub fn apply(&self, action: CartAction) -> Self {
        self.clone().reduce(action)
    }

    /// Lines in insertion order
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    /// Line with `key`
    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&CartLine> {
        self.items.iter().find(|l| l.key() == key)
    }

    /// Whether a line with `key` exists
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &CartKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct lines
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of unit price times quantity
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity.get())).sum()
    }
}

/// Persisted shape: `{ "items": [...] }`
#[derive(Serialize, Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartLine>,
}

impl From<CartState> for CartSnapshot {
    fn from(state: CartState) -> Self {
        Self { items: state.items }
    }
}

/// Lines that share a key are merged the way repeated adds are
impl From<CartSnapshot> for CartState {
    fn from(snapshot: CartSnapshot) -> Self {
        snapshot
            .items
            .into_iter()
            .fold(Self::new(), |state, line| state.reduce(CartAction::Add(line)))
    }
}
