//! Fixed-size, 1-indexed pagination.
//!
//! Out-of-range pages are never an error: navigation past either end is
//! simply refused, the way a disabled "next" button would be.

use std::ops::Range;

/// Rows per page in the event history.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    total_items: usize,
    per_page: usize,
    current: usize,
}

impl Pager {
    pub fn new(total_items: usize, per_page: usize) -> Self {
        Pager {
            total_items,
            per_page: per_page.max(1),
            current: 1,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// `ceil(total_items / per_page)`; zero when there is nothing to show.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page)
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Moves to `page` if it exists. Returns `false` and stays put otherwise.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.current = page;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.has_next() && self.go_to(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.has_previous() && self.go_to(self.current - 1)
    }

    /// New result set: new total, back to page 1.
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current = 1;
    }

    /// Zero-based index range of the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.per_page).min(self.total_items);
        let end = (start + self.per_page).min(self.total_items);
        start..end
    }

    /// The current page's slice of `items`.
    pub fn page_of<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let Range { start, end } = self.range();
        let end = end.min(items.len());
        &items[start.min(end)..end]
    }

    /// 1-based `(first, last, total)` for a "Showing 11 to 20 of 23" line.
    pub fn showing(&self) -> Option<(usize, usize, usize)> {
        let range = self.range();
        if range.is_empty() {
            None
        } else {
            Some((range.start + 1, range.end, self.total_items))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_three_items_paginate_into_three_pages() {
        let items: Vec<usize> = (0..23).collect();
        let mut pager = Pager::new(items.len(), PAGE_SIZE);
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.page_of(&items).len(), 10);

        assert!(pager.go_to(3));
        assert_eq!(pager.page_of(&items), &[20, 21, 22]);
        assert!(!pager.has_next());

        // Page 4 is refused and the pager stays on 3.
        assert!(!pager.go_to(4));
        assert!(!pager.next());
        assert_eq!(pager.current(), 3);
    }

    #[test]
    fn test_previous_disabled_on_first_page() {
        let mut pager = Pager::new(23, PAGE_SIZE);
        assert!(!pager.has_previous());
        assert!(!pager.previous());
        assert!(!pager.go_to(0));
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn test_next_and_previous_walk() {
        let mut pager = Pager::new(23, PAGE_SIZE);
        assert!(pager.next());
        assert_eq!(pager.showing(), Some((11, 20, 23)));
        assert!(pager.previous());
        assert_eq!(pager.showing(), Some((1, 10, 23)));
    }

    #[test]
    fn test_empty_result_has_no_pages() {
        let pager = Pager::new(0, PAGE_SIZE);
        assert_eq!(pager.total_pages(), 0);
        assert!(!pager.has_next());
        assert_eq!(pager.showing(), None);
        let items: Vec<u8> = Vec::new();
        assert!(pager.page_of(&items).is_empty());
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut pager = Pager::new(23, PAGE_SIZE);
        pager.go_to(3);
        pager.reset(5);
        assert_eq!(pager.current(), 1);
        assert_eq!(pager.total_pages(), 1);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        assert_eq!(Pager::new(20, PAGE_SIZE).total_pages(), 2);
    }
}
