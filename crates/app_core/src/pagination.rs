//! Page cursor over the filtered list

use std::ops::Range;

/// Append-only page cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Pages rendered so far
    page: usize,
    page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to an empty grid
    pub fn reset(&mut self) {
        self.page = 0;
    }

    /// Number of items currently rendered out of `total`
    pub fn rendered(&self, total: usize) -> usize {
        (self.page * self.page_size).min(total)
    }

    /// Is there anything beyond the rendered range?
    pub fn has_more(&self, total: usize) -> bool {
        self.rendered(total) < total
    }

    /// Reveal the next page and return the newly rendered range.
    /// Returns an empty range without advancing when nothing remains.
    pub fn append_page(&mut self, total: usize) -> Range<usize> {
        let start = self.rendered(total);
        if start >= total {
            return start..start;
        }

        let end = (start + self.page_size).min(total);
        self.page += 1;
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_bounds() {
        for total in 0..30 {
            let mut pager = Pagination::new(8);
            loop {
                let before = pager.rendered(total);
                let range = pager.append_page(total);
                let added = range.len();
                let remaining = total - before;

                assert!(added <= 8);
                assert_eq!(added, remaining.min(8));
                assert_eq!(pager.has_more(total), pager.rendered(total) < total);

                if added == 0 {
                    break;
                }
            }
            assert_eq!(pager.rendered(total), total);
        }
    }

    #[test]
    fn test_twenty_items() {
        let mut pager = Pagination::new(8);
        assert_eq!(pager.append_page(20), 0..8);
        assert!(pager.has_more(20));
        assert_eq!(pager.append_page(20), 8..16);
        assert_eq!(pager.append_page(20), 16..20);
        assert!(!pager.has_more(20));
        assert_eq!(pager.append_page(20), 20..20);
        assert_eq!(pager.page(), 3);
    }

    #[test]
    fn test_reset() {
        let mut pager = Pagination::new(8);
        pager.append_page(20);
        pager.append_page(20);
        pager.reset();
        assert_eq!(pager.rendered(20), 0);
        assert_eq!(pager.append_page(5), 0..5);
        assert!(!pager.has_more(5));
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let mut pager = Pagination::new(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(pager.append_page(3), 0..1);
    }
}
