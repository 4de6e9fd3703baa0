use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

/// Represents pagination parameters for SQL queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

/// Pagination block returned alongside a page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_count: i64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    /// Create pagination with page number (1-indexed, 0 treated as 1) and per-page count
    pub fn new(page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        Self {
            limit: per_page,
            offset: (page - 1).saturating_mul(per_page),
        }
    }

    /// Resolve optional request parameters against the configured default and cap
    pub fn from_request(
        page: Option<u32>,
        per_page: Option<u32>,
        default_per_page: u32,
        max_per_page: u32,
    ) -> Self {
        let per_page = per_page
            .filter(|p| *p > 0)
            .unwrap_or(default_per_page)
            .min(max_per_page.max(1));
        Self::new(page.unwrap_or(1), per_page)
    }

    /// Append bound `LIMIT`/`OFFSET` clauses
    pub fn push_to(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(self.limit));
        builder.push(" OFFSET ");
        builder.push_bind(i64::from(self.offset));
    }

    /// Calculate total pages given a total count
    pub fn total_pages(&self, total_count: i64) -> u32 {
        let total = total_count.max(0) as u64;
        let limit = u64::from(self.limit);
        total.div_ceil(limit) as u32
    }

    /// Get current page number (1-indexed)
    pub fn current_page(&self) -> u32 {
        (self.offset / self.limit) + 1
    }

    /// Check if there's a next page
    pub fn has_next_page(&self, total_count: i64) -> bool {
        i64::from(self.offset) + i64::from(self.limit) < total_count
    }

    /// Check if there's a previous page
    pub fn has_previous_page(&self) -> bool {
        self.offset > 0
    }

    pub fn meta(&self, total_count: i64) -> PaginationMeta {
        PaginationMeta {
            page: self.current_page(),
            per_page: self.limit,
            total_count,
            total_pages: self.total_pages(total_count),
            has_next: self.has_next_page(total_count),
            has_previous: self.has_previous_page(),
        }
    }
}
