//! Shared pagination contract.
//!
//! Every listing in the service (index, group, profile, comments, feed) uses
//! the same 1-based, fixed-size pages. Out-of-range page numbers never fail:
//! a request below page 1 clamps to the first page and a request past the end
//! clamps to the last page. An empty collection yields an empty first page.

use serde::{Deserialize, Serialize};

/// A bounded slice of an ordered result set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Assemble a page from an already-sliced item list and the collection
    /// totals. `page` must be the clamped page number the slice was fetched
    /// for.
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total_items: i64) -> Self {
        let total_pages = total_pages(total_items, page_size);
        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

/// Query parameters accepted by all listing endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Total page count; an empty collection still has one (empty) page.
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if total_items <= 0 {
        1
    } else {
        (total_items + page_size - 1) / page_size
    }
}

/// Clamp a requested page number into the valid range and return the
/// `(page, offset)` pair to fetch.
pub fn clamp_page(requested: i64, total_items: i64, page_size: i64) -> (i64, i64) {
    let last = total_pages(total_items, page_size);
    let page = requested.clamp(1, last);
    (page, (page - 1) * page_size)
}
