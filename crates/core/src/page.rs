//! Paging primitives for list endpoints.

use serde::Serialize;

/// One stable page of a collection, with counts derived from the full
/// collection size.
///
/// Pages are zero-indexed. A `page` past the end of the collection yields an
/// empty `items` slice while the totals still describe the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build a page from an already-cut slice plus the full collection size.
    ///
    /// `size` must be positive; the request validation layer rejects zero
    /// before this is reached.
    pub fn from_counts(items: Vec<T>, page: u32, size: u32, total_items: u64) -> Self {
        let size = size.max(1);
        let total_pages = (total_items.div_ceil(u64::from(size))) as u32;

        Self {
            items,
            page,
            size,
            total_items,
            total_pages,
        }
    }

    /// Cut one page out of the full collection.
    pub fn from_full(all: Vec<T>, page: u32, size: u32) -> Self {
        let total_items = all.len() as u64;
        let size = size.max(1);
        let items = all
            .into_iter()
            .skip(page as usize * size as usize)
            .take(size as usize)
            .collect();

        Self::from_counts(items, page, size, total_items)
    }

}
