//! Page bookkeeping for the product grid.

use std::ops::Range;

/// Page sizes offered by the size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_PAGE_NUMBER: usize = 1;

/// Current page position and the size of the set being paged.
///
/// `page_number` is 1-based and `page_size` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page_number: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    /// First page of an empty set. A zero `page_size` falls back to the default.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            total: 0,
        }
    }

    /// Zero-based offset of the first item on the current page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page_number.max(1) - 1).saturating_mul(self.page_size)
    }

    /// Number of pages needed for `total`; at least one.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Index range of the current page within a set of `len` items, clipped to
    /// the set.
    #[must_use]
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.offset().min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    /// Current page of a fully materialized set.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.visible_range(items.len())]
    }

    /// Pulls `page_number` back inside `1..=page_count()`.
    pub fn clamp_page(&mut self) {
        self.page_number = self.page_number.clamp(1, self.page_count());
    }
}
