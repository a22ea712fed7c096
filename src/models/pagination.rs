use serde::{Deserialize, Serialize};

/// Page window of a list view. `offset == (page - 1) * limit` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    offset: u32,
    limit: u32,
    total: u64,
}

impl Pagination {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            offset: 0,
            limit: limit.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Move to `page` with `limit` rows per page. Zero values clamp to 1.
    pub fn on_paginate(&mut self, page: u32, limit: u32) {
        self.limit = limit.max(1);
        self.page = page.max(1);
        self.offset = (self.page - 1).saturating_mul(self.limit);
    }

    pub fn go_to(&mut self, page: u32) {
        self.on_paginate(page, self.limit);
    }

    pub fn reset(&mut self) {
        self.go_to(1);
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    /// At least one page, even when the list is empty
    pub fn page_count(&self) -> u32 {
        let pages = self.total.div_ceil(self.limit as u64).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// 1-based index range shown in the footer, e.g. `21–40 of 57`
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "0 results".to_string();
        }
        let first = self.offset as u64 + 1;
        let last = (self.offset as u64 + self.limit as u64).min(self.total);
        format!("{}–{} of {}", first.min(self.total), last, self.total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_invariant_holds_after_every_paginate() {
        let mut pagination = Pagination::new(20);
        for page in 1..=40u32 {
            for limit in [1u32, 5, 10, 20, 25, 100] {
                pagination.on_paginate(page, limit);
                assert_eq!(pagination.offset(), (pagination.page() - 1) * pagination.limit());
            }
        }
    }

    #[test]
    fn zero_page_and_limit_are_clamped() {
        let mut pagination = Pagination::new(0);
        assert_eq!(pagination.limit(), 1);

        pagination.on_paginate(0, 0);
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), 1);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn page_count_and_navigation_flags() {
        let mut pagination = Pagination::new(10);
        assert_eq!(pagination.page_count(), 1);
        assert!(!pagination.has_next());

        pagination.set_total(57);
        assert_eq!(pagination.page_count(), 6);
        assert!(pagination.has_next());
        assert!(!pagination.has_prev());

        pagination.go_to(6);
        assert!(!pagination.has_next());
        assert!(pagination.has_prev());
        assert_eq!(pagination.offset(), 50);
    }

    #[test]
    fn range_label_is_clipped_to_total() {
        let mut pagination = Pagination::new(20);
        assert_eq!(pagination.range_label(), "0 results");

        pagination.set_total(57);
        pagination.go_to(3);
        assert_eq!(pagination.range_label(), "41–57 of 57");
    }
}
