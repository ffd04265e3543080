//! Page slicing
//!
//! An out-of-range page request is clamped to the last page rather than
//! rejected, so a filter that shrinks the result never strands the caller on
//! an empty page.

use std::ops::Range;
use tracing::trace;

/// Position of one page within a row sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Effective page index after clamping
    pub page_index: usize,
    pub page_size: usize,
    /// Always at least 1, even with no rows
    pub page_count: usize,
    /// Rows covered by this page, as positions in the paged sequence
    pub range: Range<usize>,
    pub can_previous: bool,
    pub can_next: bool,
    /// True when the requested index was out of range and had to be moved
    pub clamped: bool,
}

impl PageInfo {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The rows of `items` on this page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range.clone()]
    }
}

/// `ceil(total / page_size)`, never less than 1
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Locate page `page_index` in a sequence of `total` rows.
///
/// A zero page size is treated as one row per page.
pub fn apply(total: usize, page_index: usize, page_size: usize) -> PageInfo {
    let page_size = page_size.max(1);
    let page_count = page_count(total, page_size);
    let effective = page_index.min(page_count - 1);

    let start = (effective * page_size).min(total);
    let end = (start + page_size).min(total);

    if effective != page_index {
        trace!(
            target: "pagination",
            "Clamped page {} to {} of {}",
            page_index,
            effective,
            page_count
        );
    }

    PageInfo {
        page_index: effective,
        page_size,
        page_count,
        range: start..end,
        can_previous: effective > 0,
        can_next: effective + 1 < page_count,
        clamped: effective != page_index,
    }
}

/// Page index that keeps the anchor row visible under a new page size.
///
/// `anchor_position` is where the anchor row sits in the paged sequence;
/// `None` means it no longer exists and paging restarts at the first page.
pub fn anchor_page_index(anchor_position: Option<usize>, new_page_size: usize) -> usize {
    match anchor_position {
        Some(position) => position / new_page_size.max(1),
        None => 0,
    }
}
