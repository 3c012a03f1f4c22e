use std::ops::Range;

/// Fixed-size, 1-based client-side pagination over an already-fetched list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_items: usize,
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    /// Start on page 1. A zero page size is treated as 1.
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            total_items,
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Jump to `page`, clamped to the valid range.
    pub fn at_page(mut self, page: usize) -> Self {
        self.current_page = page.clamp(1, self.page_count().max(1));
        self
    }

    /// `ceil(total_items / page_size)`; zero for an empty list.
    pub fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// "Précédent" is enabled.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// "Suivant" is enabled.
    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count()
    }

    /// Move forward one page. Returns `false` (and stays put) on the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Move back one page. Returns `false` (and stays put) on the first page.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Index range of the current page within the full list.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }
}
