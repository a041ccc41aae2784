//! Pagination and load-more cursors

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

/// Classic numbered pages over the filtered rows.
///
/// Pages are 1-based. `total_pages` is never less than one, so an empty grid
/// still sits on page 1 of 1. The requested page is kept as-is when the row
/// count shrinks and clamped whenever it is read, so narrowing and then
/// widening a filter lands back on the same page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    requested_page: usize,
    items_per_page: usize,
}

impl Pagination {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            requested_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    /// The current page for `total_items`, clamped to `[1, total_pages]`.
    pub fn current_page(&self, total_items: usize) -> usize {
        self.requested_page.clamp(1, self.total_pages(total_items))
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.items_per_page).max(1)
    }

    pub fn start_index(&self, total_items: usize) -> usize {
        (self.current_page(total_items) - 1) * self.items_per_page
    }

    /// The slice of the filtered rows shown on the current page.
    pub fn range(&self, total_items: usize) -> Range<usize> {
        let start = self.start_index(total_items).min(total_items);
        let end = (start + self.items_per_page).min(total_items);
        start..end
    }

    /// Moves to `page`, clamped to `[1, total_pages]`. Returns the page
    /// actually selected.
    pub fn set_page(&mut self, page: usize, total_items: usize) -> usize {
        self.requested_page = page.clamp(1, self.total_pages(total_items));
        self.requested_page
    }

    /// Changes the page size and returns to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.requested_page = 1;
    }
}

/// Arguments passed to the load-more callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMoreRequest {
    pub page: usize,
    pub page_size: usize,
}

/// What a load-more call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    /// Revealed another page of rows already held by the grid.
    Extended,
    /// Asked the caller for the next page.
    Requested(LoadMoreRequest),
    /// A request is already in flight.
    Busy,
    /// Everything is shown and the caller reported no more data.
    Exhausted,
}

/// Cumulative "load more" window over the filtered rows.
///
/// The visible slice always starts at row 0 and grows one page per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadMoreCursor {
    page: usize,
    page_size: usize,
    has_more: bool,
    loading: bool,
}

impl LoadMoreCursor {
    pub fn new(page_size: usize, has_more: bool) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            has_more,
            loading: false,
        }
    }

    /// Pages revealed so far.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    /// Number of rows visible out of `total_items`.
    pub fn visible_len(&self, total_items: usize) -> usize {
        (self.page * self.page_size).min(total_items)
    }

    /// Grows the window by one page.
    ///
    /// When the window already covers every resident row and the caller has
    /// more, returns a request and marks the cursor busy. Calls made while
    /// busy are ignored.
    pub fn request(&mut self, total_items: usize) -> LoadMoreOutcome {
        if self.loading {
            return LoadMoreOutcome::Busy;
        }
        if self.page * self.page_size < total_items {
            self.page += 1;
            return LoadMoreOutcome::Extended;
        }
        if !self.has_more {
            return LoadMoreOutcome::Exhausted;
        }
        self.loading = true;
        LoadMoreOutcome::Requested(LoadMoreRequest {
            page: self.page + 1,
            page_size: self.page_size,
        })
    }

    /// Completes an in-flight request: reveals the requested page and
    /// records whether the caller has more.
    pub fn finish_loading(&mut self, has_more: bool) {
        if self.loading {
            self.page += 1;
        }
        self.loading = false;
        self.has_more = has_more;
    }

    /// Abandons an in-flight request without advancing.
    pub fn abort_loading(&mut self) {
        self.loading = false;
    }

    /// Changes the page size and shrinks the window back to one page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.reset();
    }

    /// Returns to the first page.
    pub fn reset(&mut self) {
        self.page = 1;
        self.loading = false;
    }
}
