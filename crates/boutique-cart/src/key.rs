//! Composite identity of a cart line

use boutique_catalog::ProductId;
use std::fmt;

/// Size or color placeholder when none applies
pub const DEFAULT_VARIANT: &str = "default";

/// `(product id, size, color)` identity of a cart line
///
/// Two additions with equal keys land on the same line. A missing or blank
/// size or color is stored as [`DEFAULT_VARIANT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartKey {
    product_id: ProductId,
    size: String,
    color: String,
}

impl CartKey {
    /// Build a key, substituting [`DEFAULT_VARIANT`] for missing variants
    pub fn new(product_id: impl Into<ProductId>, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            product_id: product_id.into(),
            size: variant_or_default(size),
            color: variant_or_default(color),
        }
    }

    /// Product part
    #[inline]
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Size part, possibly [`DEFAULT_VARIANT`]
    #[inline]
    #[must_use]
    pub fn size(&self) -> &str {
        &self.size
    }

    /// Color part, possibly [`DEFAULT_VARIANT`]
    #[inline]
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Whether this key is for `product_id` and agrees with each variant given
    ///
    /// Compares the parts, not the rendered `id-size-color` form, which is
    /// ambiguous once a variant contains `-`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        self.product_id == *product_id
            && variant_matches(&self.size, size)
            && variant_matches(&self.color, color)
    }
}

impl fmt::Display for CartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.product_id, self.size, self.color)
    }
}

fn variant_or_default(variant: Option<&str>) -> String {
    match variant.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DEFAULT_VARIANT.to_string(),
    }
}

fn variant_matches(have: &str, wanted: Option<&str>) -> bool {
    match wanted.map(str::trim) {
        Some(w) if !w.is_empty() => w == have,
        _ => true,
    }
}
