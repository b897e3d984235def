//! Client-side pagination over fetched lists.
//!
//! Pages are 1-indexed. `total_pages = ceil(len / page_size)`; an empty
//! list has zero pages, and any requested page number is clamped into
//! `[1, max(total_pages, 1)]`.

use std::ops::RangeInclusive;

/// Splits slices into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

/// One page of a slice, plus the numbers needed to render page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// This page's number (1-indexed).
    pub number: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
}

impl Paginator {
    /// Creates a paginator. A zero page size is treated as 1.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total_items`.
    #[must_use]
    pub const fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Clamps a requested page number into the valid range.
    #[must_use]
    pub fn clamp(&self, page: usize, total_items: usize) -> usize {
        page.clamp(1, self.total_pages(total_items).max(1))
    }

    /// Returns page `page` of `items`, clamping out-of-range requests.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> Page<'a, T> {
        let number = self.clamp(page, items.len());
        let start = (number - 1).saturating_mul(self.page_size);
        let rest = items.get(start..).unwrap_or(&[]);
        let slice = rest.get(..self.page_size).unwrap_or(rest);
        Page {
            items: slice,
            number,
            total_pages: self.total_pages(items.len()),
            total_items: items.len(),
        }
    }
}

impl<T> Page<'_, T> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Number of the previous page, staying on the first page.
    #[must_use]
    pub fn previous(&self) -> usize {
        self.number.saturating_sub(1).max(1)
    }

    /// Number of the next page, staying on the last page.
    #[must_use]
    pub fn next(&self) -> usize {
        (self.number + 1).min(self.total_pages.max(1))
    }

    /// Page numbers to render as links.
    #[must_use]
    pub fn numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages
    }

    /// Whether page controls are needed at all.
    #[must_use]
    pub const fn needs_controls(&self) -> bool {
        self.total_pages > 1
    }
}
