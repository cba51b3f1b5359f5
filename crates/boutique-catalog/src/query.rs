//! Filter, sort and range-pagination parameters for table reads

use crate::error::ParseError;
use crate::order::OrderStatus;
use crate::product::ProductStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Opposite direction, used when a column header is clicked twice
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseError::new("sort direction", s)),
        }
    }
}

/// Inclusive row range `[from, to]`, the form range pagination takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row offset
    pub from: u64,
    /// Last row offset, inclusive
    pub to: u64,
}

impl RowRange {
    /// Range covering 1-based `page` of `limit` rows
    ///
    /// Page 0 is treated as page 1 and a zero limit as one row.
    #[must_use]
    pub fn for_page(page: u32, limit: u32) -> Self {
        let page = u64::from(page.max(1));
        let limit = u64::from(limit.max(1));
        let from = (page - 1) * limit;
        Self {
            from,
            to: from + limit - 1,
        }
    }

    /// Number of rows covered
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    /// Always false; a range covers at least one row
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

macro_rules! sort_field {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl $name {
            /// Column name
            #[inline]
            #[must_use]
            pub fn column(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.column())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(ParseError::new(stringify!($name), s)),
                }
            }
        }
    };
}

sort_field!(
    /// Sortable product columns
    ProductSortField {
        Id => "id",
        Name => "name",
        Price => "price",
        Stock => "stock",
        CreatedAt => "created_at",
    } default Name
);

sort_field!(
    /// Sortable order columns
    OrderSortField {
        CreatedAt => "created_at",
        TotalAmount => "total_amount",
        Status => "status",
        CustomerName => "customer_name",
    } default CreatedAt
);

/// Product listing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub limit: u32,
    /// Case-insensitive substring on name, category and Arabic name
    pub search: Option<String>,
    pub sort_by: ProductSortField,
    pub direction: SortDirection,
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    /// Only products with stock strictly below this value
    pub stock_below: Option<u32>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            sort_by: ProductSortField::default(),
            direction: SortDirection::Asc,
            category: None,
            status: None,
            stock_below: None,
        }
    }
}

impl ProductQuery {
    /// Default query: first page of 10 sorted by name
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With page
    #[inline]
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// With search text; blank text clears the filter
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = non_blank(text.into());
        self
    }

    /// With sort
    #[inline]
    #[must_use]
    pub fn sort(mut self, field: ProductSortField, direction: SortDirection) -> Self {
        self.sort_by = field;
        self.direction = direction;
        self
    }

    /// With category filter
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    /// With status filter
    #[inline]
    #[must_use]
    pub fn status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// With stock ceiling (exclusive)
    #[inline]
    #[must_use]
    pub fn stock_below(mut self, threshold: u32) -> Self {
        self.stock_below = Some(threshold);
        self
    }

    /// Row range for the requested page
    #[inline]
    #[must_use]
    pub fn range(&self) -> RowRange {
        RowRange::for_page(self.page, self.limit)
    }
}

/// Order listing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderQuery {
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub limit: u32,
    /// Exact order id, or case-insensitive substring on customer name/email
    pub search: Option<String>,
    /// `None` means every status
    pub status: Option<OrderStatus>,
    pub sort_by: OrderSortField,
    pub direction: SortDirection,
    /// Inclusive lower bound on creation time
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on creation time
    pub created_before: Option<DateTime<Utc>>,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            status: None,
            sort_by: OrderSortField::default(),
            direction: SortDirection::Desc,
            created_from: None,
            created_before: None,
        }
    }
}

impl OrderQuery {
    /// Default query: newest first, first page of 10
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With page
    #[inline]
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// With search text; blank text clears the filter
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = non_blank(text.into());
        self
    }

    /// With status filter
    #[inline]
    #[must_use]
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Parse a status filter where `"all"` means no filter
    pub fn status_filter(mut self, filter: &str) -> Result<Self, ParseError> {
        self.status = match filter {
            "" | "all" => None,
            other => Some(other.parse()?),
        };
        Ok(self)
    }

    /// With sort
    #[inline]
    #[must_use]
    pub fn sort(mut self, field: OrderSortField, direction: SortDirection) -> Self {
        self.sort_by = field;
        self.direction = direction;
        self
    }

    /// With creation window `[from, before)`
    #[inline]
    #[must_use]
    pub fn created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_from = from;
        self.created_before = before;
        self
    }

    /// Row range for the requested page
    #[inline]
    #[must_use]
    pub fn range(&self) -> RowRange {
        RowRange::for_page(self.page, self.limit)
    }
}

/// One page of rows plus the exact total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Build a page, deriving the page count from `limit`
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, limit: u32) -> Self {
        let limit = u64::from(limit.max(1));
        Self {
            items,
            total_count,
            total_pages: total_count.div_ceil(limit),
        }
    }

    /// Page with no rows
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
        }
    }

    /// Whether the page holds no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform rows, keeping counts
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn row_range_for_page() {
        assert_eq!(RowRange::for_page(1, 10), RowRange { from: 0, to: 9 });
        assert_eq!(RowRange::for_page(3, 10), RowRange { from: 20, to: 29 });
        assert_eq!(RowRange::for_page(0, 0), RowRange { from: 0, to: 0 });
        assert_eq!(RowRange::for_page(2, 25).len(), 25);
    }

    #[test]
    fn page_counts() {
        let page: Page<u8> = Page::new(vec![1, 2], 42, 10);
        assert_eq!(page.total_pages, 5);

        let page: Page<u8> = Page::new(Vec::new(), 0, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.is_empty());

        let mapped = Page::new(vec![1u8, 2], 2, 10).map(u32::from);
        assert_eq!(mapped.items, vec![1u32, 2]);
    }

    #[test]
    fn blank_search_is_no_filter() {
        assert_eq!(ProductQuery::new().search("   ").search, None);
        assert_eq!(
            ProductQuery::new().search(" robe ").search.as_deref(),
            Some("robe")
        );
    }

    #[test]
    fn order_status_filter_all() {
        let q = OrderQuery::new().status_filter("all").unwrap();
        assert_eq!(q.status, None);
        let q = OrderQuery::new().status_filter("shipped").unwrap();
        assert_eq!(q.status, Some(OrderStatus::Shipped));
        assert!(OrderQuery::new().status_filter("lost").is_err());
    }

    #[test]
    fn sort_fields_parse() {
        assert_eq!("price".parse::<ProductSortField>().unwrap(), ProductSortField::Price);
        assert_eq!(OrderSortField::default().column(), "created_at");
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }
}
