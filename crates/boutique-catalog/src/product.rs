//! Catalog products and their write payloads

use crate::error::{FieldError, ParseError, ValidationError};
use crate::ids::ProductId;
use crate::locale::Locale;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible in the storefront
    #[default]
    Active,
    /// Hidden from the storefront
    Inactive,
    /// Not yet published
    Draft,
}

impl ProductStatus {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Draft => "draft",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "draft" => Ok(Self::Draft),
            _ => Err(ParseError::new("product status", s)),
        }
    }
}

/// Catalog row from the `products` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_fr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(default)]
    pub category: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Default size used when a shopper picks none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Default color used when a shopper picks none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create an active product with no variants or stock
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            name_fr: None,
            name_ar: None,
            description: None,
            description_ar: None,
            category: String::new(),
            price,
            main_image_url: None,
            images: Vec::new(),
            sizes: Vec::new(),
            colors: Vec::new(),
            size: None,
            color: None,
            stock: 0,
            status: ProductStatus::Active,
            created_at: None,
        }
    }

    /// With default size
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// With default color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// With localized names
    #[must_use]
    pub fn with_names(mut self, fr: Option<&str>, ar: Option<&str>) -> Self {
        self.name_fr = fr.map(str::to_string);
        self.name_ar = ar.map(str::to_string);
        self
    }

    /// With main image
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.main_image_url = Some(url.into());
        self
    }

    /// With category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// With stock level
    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Name shown for `locale`
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        locale.pick(&self.name, self.name_fr.as_deref(), self.name_ar.as_deref())
    }

    /// Main image followed by the gallery, without blanks or duplicates
    #[must_use]
    pub fn gallery(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for url in self
            .main_image_url
            .iter()
            .chain(self.images.iter())
            .map(String::as_str)
        {
            if !url.is_empty() && !out.contains(&url) {
                out.push(url);
            }
        }
        out
    }

    /// Whether stock is under `threshold`
    #[inline]
    #[must_use]
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock < threshold
    }
}

/// Create or update payload for a product
///
/// Built by admin forms and validated before it is sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_fr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    pub category: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub status: ProductStatus,
}

impl ProductDraft {
    /// Create draft with the required fields
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            ..Self::default()
        }
    }

    /// Prefill an edit form from an existing product
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            name_fr: product.name_fr.clone(),
            name_ar: product.name_ar.clone(),
            description: product.description.clone(),
            description_ar: product.description_ar.clone(),
            category: product.category.clone(),
            price: product.price,
            main_image_url: product.main_image_url.clone(),
            images: product.images.clone(),
            sizes: product.sizes.clone(),
            colors: product.colors.clone(),
            stock: product.stock,
            status: product.status,
        }
    }

    /// Add a size option, ignoring blanks and duplicates
    pub fn add_size(&mut self, size: &str) {
        push_unique(&mut self.sizes, size);
    }

    /// Add a color option, ignoring blanks and duplicates
    pub fn add_color(&mut self, color: &str) {
        push_unique(&mut self.colors, color);
    }

    /// Add a gallery image, ignoring blanks and duplicates
    pub fn add_image(&mut self, url: &str) {
        push_unique(&mut self.images, url);
    }

    /// Check required fields, reporting every problem at once
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Product name is required"));
        }
        if self.category.trim().is_empty() {
            errors.push(FieldError::new("category", "Category is required"));
        }
        if self.price.is_zero() {
            errors.push(FieldError::new("price", "Valid price is required"));
        }
        ValidationError::check(errors)
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
