//! Pagination.

use serde::{Deserialize, Serialize};

/// Which page to cut from the ordered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl PageRequest {
    /// Creates a request, clamping both values to at least 1.
    pub fn new(page: usize, page_size: usize) -> Self {
        PageRequest {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// The first page of the given size.
    pub fn first(page_size: usize) -> Self {
        PageRequest::new(1, page_size)
    }

    /// Index of the first row on this page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.page_size.max(1))
    }
}

/// Number of pages needed for `total` rows; never less than 1.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// One page of query results plus pagination metadata.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    /// Rows on this page, in result order.
    pub items: Vec<&'a T>,
    /// Rows matching search and filters, across all pages.
    pub total_count: usize,
    /// `max(1, ceil(total_count / page_size))`.
    pub page_count: usize,
    /// The page that was requested.
    pub page: usize,
    /// The page size that was applied.
    pub page_size: usize,
}

impl<'a, T> Page<'a, T> {
    /// Cuts `request` out of the full ordered result.
    ///
    /// A page past the end yields no rows; counts are unaffected.
    pub fn slice(ordered: &[&'a T], request: PageRequest) -> Self {
        let request = PageRequest::new(request.page, request.page_size);
        let total_count = ordered.len();
        let start = request.offset().min(total_count);
        let end = start.saturating_add(request.page_size).min(total_count);
        Page {
            items: ordered[start..end].to_vec(),
            total_count,
            page_count: page_count(total_count, request.page_size),
            page: request.page,
            page_size: request.page_size,
        }
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based positions of the first and last row on this page, for
    /// "showing X-Y of Z" summaries.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = PageRequest::new(self.page, self.page_size).offset() + 1;
        Some((first, first + self.items.len() - 1))
    }

    /// Returns `true` if a following page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// Returns `true` if a preceding page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_never_zero() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(3, 0), 3);
    }

    #[test]
    fn request_clamps() {
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, page_size: 1 });
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn slice_middle_and_tail() {
        let data: Vec<u32> = (1..=7).collect();
        let refs: Vec<&u32> = data.iter().collect();

        let page = Page::slice(&refs, PageRequest::new(2, 3));
        assert_eq!(page.items, vec![&4, &5, &6]);
        assert_eq!(page.range(), Some((4, 6)));
        assert!(page.has_next());
        assert!(page.has_prev());

        let tail = Page::slice(&refs, PageRequest::new(3, 3));
        assert_eq!(tail.items, vec![&7]);
        assert_eq!(tail.range(), Some((7, 7)));
        assert!(!tail.has_next());
    }

    #[test]
    fn slice_past_end_is_empty() {
        let data = [1u8, 2, 3];
        let refs: Vec<&u8> = data.iter().collect();
        let page = Page::slice(&refs, PageRequest::new(5, 2));
        assert!(page.is_empty());
        assert_eq!(page.total_count, 3);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.range(), None);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let data = [1u8];
        let refs: Vec<&u8> = data.iter().collect();
        let page = Page::slice(&refs, PageRequest::new(usize::MAX, usize::MAX));
        assert!(page.is_empty());
    }
}
