//! Page arithmetic for the catalog listing

use serde::Serialize;
use utoipa::ToSchema;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Parse the page number from the request path.
///
/// Anything that is not a plain integer (missing, empty, `abc`, `2.5`, out of
/// range) becomes 0, which is never a valid page.
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0)
}

/// Number of pages needed to show `total` rows, `ceil(total / page_size)`
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// A requested page that can be turned into a store query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: i64,
    size: i64,
    offset: i64,
}

impl PageRequest {
    /// `None` when the number is below 1 or the offset does not fit
    pub fn new(number: i64, size: i64) -> Option<Self> {
        if number < 1 || size < 1 {
            return None;
        }
        let offset = size.checked_mul(number - 1)?;
        Some(Self {
            number,
            size,
            offset,
        })
    }

    pub fn first(size: i64) -> Self {
        Self {
            number: 1,
            size: size.max(1),
            offset: 0,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// Page metadata for this request against `total` matching rows,
    /// regardless of whether the page exists
    pub fn pagination(&self, total: i64) -> Pagination {
        Pagination {
            page: self.number,
            page_size: self.size,
            offset: self.offset,
            total_count: total,
            total_pages: total_pages(total, self.size),
        }
    }

    /// Page metadata, or `None` when the page is outside `1..=total_pages`
    pub fn resolve(&self, total: i64) -> Option<Pagination> {
        let pagination = self.pagination(total);
        pagination.is_valid().then_some(pagination)
    }
}

/// Page metadata handed to the listing view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub offset: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn is_valid(&self) -> bool {
        self.page >= 1 && self.page <= self.total_pages
    }
}
