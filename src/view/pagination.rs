//! Paging over top-level comments. Replies are never paginated.

use crate::tree::Tree;
use crate::types::Node;
use serde::Serialize;
use std::sync::Arc;

/// Pagination metadata for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based index of the page being shown.
    pub index: usize,
    /// Number of pages, zero for an empty tree.
    pub count: usize,
    pub size: usize,
    /// Number of top-level comments.
    pub total: usize,
}

impl PageInfo {
    pub fn new(total: usize, index: usize, size: usize) -> Self {
        Self {
            index,
            count: page_count(total, size),
            size,
            total,
        }
    }

    /// Whether `index` points at an existing page.
    pub fn in_range(&self) -> bool {
        self.index >= 1 && self.index <= self.count
    }
}

/// `ceil(total / page_size)`; zero when the page size is zero.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Top-level comments `[(page_index-1)*page_size, page_index*page_size)`,
/// clamped to the sequence. Out-of-range pages are empty.
pub fn visible_page(tree: &Tree, page_index: usize, page_size: usize) -> &[Arc<Node>] {
    page_slice(tree.comments(), page_index, page_size)
}

pub(crate) fn page_slice<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    let Some(start) = page_index
        .checked_sub(1)
        .and_then(|i| i.checked_mul(page_size))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(5, 2), 3);
        assert_eq!(page_count(4, 2), 2);
        assert_eq!(page_count(0, 2), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(3, 0), 0);
    }

    #[test]
    fn test_last_page_is_partial() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(page_slice(&items, 1, 2), &[1, 2]);
        assert_eq!(page_slice(&items, 2, 2), &[3, 4]);
        assert_eq!(page_slice(&items, 3, 2), &[5]);
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items = [1, 2, 3];
        assert!(page_slice(&items, 0, 2).is_empty());
        assert!(page_slice(&items, 3, 2).is_empty());
        assert!(page_slice(&items, usize::MAX, 2).is_empty());
        assert!(page_slice(&items, 1, 0).is_empty());
    }

    #[test]
    fn test_page_info_range() {
        assert!(PageInfo::new(5, 3, 2).in_range());
        assert!(!PageInfo::new(5, 4, 2).in_range());
        assert!(!PageInfo::new(0, 1, 2).in_range());
    }
}
