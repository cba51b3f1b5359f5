//! Cart lines

use crate::key::CartKey;
use crate::quantity::Quantity;
use boutique_catalog::{Locale, Money, Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One purchasable unit in the cart
///
/// Name, price and image are copied from the product when the line is
/// created and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CartLineRecord", into = "CartLineRecord")]
pub struct CartLine {
    key: CartKey,
    pub name: String,
    pub name_fr: Option<String>,
    pub name_ar: Option<String>,
    pub price: Money,
    pub main_image_url: Option<String>,
    /// Size chosen by the shopper or the product default
    pub selected_size: Option<String>,
    /// Color chosen by the shopper or the product default
    pub selected_color: Option<String>,
    pub quantity: Quantity,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Snapshot `product` into a new line
    ///
    /// Missing `size`/`color` fall back to the product's defaults, and the
    /// key is built from the resolved values.
    pub fn from_product(
        product: &Product,
        quantity: Quantity,
        size: Option<&str>,
        color: Option<&str>,
        added_at: DateTime<Utc>,
    ) -> Self {
        let selected_size = resolve_variant(size, product.size.as_deref());
        let selected_color = resolve_variant(color, product.color.as_deref());
        Self {
            key: CartKey::new(
                product.id.clone(),
                selected_size.as_deref(),
                selected_color.as_deref(),
            ),
            name: product.name.clone(),
            name_fr: product.name_fr.clone(),
            name_ar: product.name_ar.clone(),
            price: product.price,
            main_image_url: product.main_image_url.clone(),
            selected_size,
            selected_color,
            quantity,
            added_at,
        }
    }

    /// Line identity
    #[inline]
    #[must_use]
    pub fn key(&self) -> &CartKey {
        &self.key
    }

    /// Product this line was taken from
    #[inline]
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        self.key.product_id()
    }

    /// Unit price times quantity
    #[inline]
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity.get())
    }

    /// Name shown for `locale`
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        locale.pick(&self.name, self.name_fr.as_deref(), self.name_ar.as_deref())
    }

    /// `"Size: M | Color: Red"` style variant label, empty when neither is set
    #[must_use]
    pub fn variant_label(&self) -> String {
        let parts: Vec<String> = [
            self.selected_size.as_deref().map(|s| format!("Size: {s}")),
            self.selected_color.as_deref().map(|c| format!("Color: {c}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        parts.join(" | ")
    }
}

fn resolve_variant(chosen: Option<&str>, fallback: Option<&str>) -> Option<String> {
    chosen
        .filter(|v| !v.trim().is_empty())
        .or(fallback.filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
}

/// Persisted shape of a cart line
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLineRecord {
    #[serde(default)]
    cart_item_id: String,
    product_id: ProductId,
    name: String,
    #[serde(rename = "name_fr", default)]
    name_fr: Option<String>,
    #[serde(rename = "name_ar", default)]
    name_ar: Option<String>,
    price: Money,
    #[serde(default)]
    main_image_url: Option<String>,
    #[serde(default)]
    selected_size: Option<String>,
    #[serde(default)]
    selected_color: Option<String>,
    quantity: Quantity,
    added_at: DateTime<Utc>,
}

impl From<CartLine> for CartLineRecord {
    fn from(line: CartLine) -> Self {
        Self {
            cart_item_id: line.key.to_string(),
            product_id: line.key.product_id().clone(),
            name: line.name,
            name_fr: line.name_fr,
            name_ar: line.name_ar,
            price: line.price,
            main_image_url: line.main_image_url,
            selected_size: line.selected_size,
            selected_color: line.selected_color,
            quantity: line.quantity,
            added_at: line.added_at,
        }
    }
}

/// The key is rebuilt from the product id and variants; the stored
/// `cartItemId` is only compared for the log. Older snapshots built the id
/// from the raw choice while storing the product default as the variant, so
/// their ids can disagree with their fields.
impl From<CartLineRecord> for CartLine {
    fn from(record: CartLineRecord) -> Self {
        let key = CartKey::new(
            record.product_id,
            record.selected_size.as_deref(),
            record.selected_color.as_deref(),
        );
        if !record.cart_item_id.is_empty() && record.cart_item_id != key.to_string() {
            tracing::debug!(stored = %record.cart_item_id, key = %key, "cart line id rebuilt");
        }
        Self {
            key,
            name: record.name,
            name_fr: record.name_fr,
            name_ar: record.name_ar,
            price: record.price,
            main_image_url: record.main_image_url,
            selected_size: record.selected_size,
            selected_color: record.selected_color,
            quantity: record.quantity,
            added_at: record.added_at,
        }
    }
}
