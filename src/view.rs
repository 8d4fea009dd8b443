//! Page projection over a dataset. Nothing here mutates the records.

/// Number of pages needed for `len` items. Zero for an empty dataset.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// The items on 1-based page `page_index`. Out-of-range pages are empty.
pub fn page<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    if page_index == 0 || page_size == 0 {
        return &[];
    }
    let start = (page_index - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Current page position. Keeps the page index inside the dataset as it
/// shrinks or the page size changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Pager {
    /// A pager on page 1. A zero page size is raised to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    /// Move to `page`, bounded to `1..=total_pages` (page 1 when empty).
    pub fn go_to(&mut self, page: usize, len: usize) {
        let last = self.total_pages(len).max(1);
        self.current_page = page.clamp(1, last);
    }

    /// Change the page size. Always returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Pull the page index back after the dataset shrank.
    pub fn clamp(&mut self, len: usize) {
        let total = self.total_pages(len);
        if self.current_page > total {
            self.current_page = total.max(1);
        }
    }

    /// The items visible on the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        page(items, self.current_page, self.page_size)
    }
}
