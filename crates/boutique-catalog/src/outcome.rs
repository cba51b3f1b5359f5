//! Read outcomes that keep "no data" and "fetch failed" apart
//!
//! Views decide between a zero-state and an error banner from this type.
//! Nothing here ever fills in placeholder rows.

use crate::query::Page;

/// Result of a read that may legitimately return nothing
#[derive(Debug)]
pub enum FetchOutcome<T, E> {
    /// Data to show
    Ready(T),
    /// Read succeeded but matched nothing
    Empty,
    /// Read failed
    Failed(E),
}

impl<T, E> FetchOutcome<T, E> {
    /// Classify a result using `is_empty`
    pub fn classify(result: Result<T, E>, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match result {
            Ok(value) if is_empty(&value) => Self::Empty,
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e),
        }
    }

    /// Whether data is available
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Whether the read failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Data, if any
    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Error, if the read failed
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Transform the data
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U, E> {
        match self {
            Self::Ready(value) => FetchOutcome::Ready(f(value)),
            Self::Empty => FetchOutcome::Empty,
            Self::Failed(e) => FetchOutcome::Failed(e),
        }
    }

    /// Back to a result, with `Empty` becoming `None`
    pub fn into_result(self) -> Result<Option<T>, E> {
        match self {
            Self::Ready(value) => Ok(Some(value)),
            Self::Empty => Ok(None),
            Self::Failed(e) => Err(e),
        }
    }
}

impl<T, E> FetchOutcome<Vec<T>, E> {
    /// Classify a row list
    pub fn from_rows(result: Result<Vec<T>, E>) -> Self {
        Self::classify(result, Vec::is_empty)
    }
}

impl<T, E> FetchOutcome<Page<T>, E> {
    /// Classify a page
    pub fn from_page(result: Result<Page<T>, E>) -> Self {
        Self::classify(result, Page::is_empty)
    }
}
