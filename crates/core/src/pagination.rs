//! Page/size normalisation for list endpoints.
//!
//! List endpoints take a 1-based `page` and a `size`. Out-of-range input is
//! normalised rather than rejected: a non-positive page becomes the first
//! page and a size outside `1..=MAX_PAGE_SIZE` falls back to the default.

use serde::Serialize;

/// Page size used when the caller supplies none or an invalid one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A normalised page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    /// Normalise raw page/size values.
    pub fn normalize(page: Option<i64>, size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => p,
            _ => 1,
        };
        let size = match size {
            Some(s) if s > 0 && s <= MAX_PAGE_SIZE => s,
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, size }
    }

    /// Row offset for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Row limit for this page.
    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// One page of results plus the total row count for the filter.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
        }
    }
}
