//! Pagination utilities for service layer
//!
//! Requested pages are clamped into the valid range instead of erroring, and
//! there is always at least one page, even for an empty result.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index as requested; any value is accepted
    pub page: i64,
    /// items per page
    pub per_page: u64,
}

/// A request resolved against a known total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub total_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: i64, per_page: u64) -> Self { Self { page, per_page } }

    /// `total_pages = max(1, ceil(total / per_page))`, page clamped into `[1, total_pages]`.
    pub fn window(self, total: u64) -> PageWindow {
        let per_page = self.per_page.max(1);
        let total_pages = total.div_ceil(per_page).max(1);
        let page = self.page.clamp(1, total_pages.min(i64::MAX as u64) as i64) as u64;
        PageWindow { page, total_pages, offset: (page - 1) * per_page, limit: per_page }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}

/// One page of results plus the numbers a pager needs.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
    pub page: u64,
}
