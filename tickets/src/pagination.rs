//! Page requests and pagination metadata.

use crate::model::Ticket;
use serde::Serialize;

/// Page used when none (or an invalid one) is given.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none (or an invalid one) is given.
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest accepted page size.
pub const MAX_LIMIT: u64 = 100;

/// A normalized, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Normalize raw numbers: non-positive values fall back to the defaults
    /// and `limit` is capped at [`MAX_LIMIT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use studentdesk_tickets::PageRequest;
    ///
    /// let req = PageRequest::new(Some(0), Some(500));
    /// assert_eq!((req.page(), req.limit()), (1, 100));
    /// ```
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let positive = |value: Option<i64>| value.and_then(|v| u64::try_from(v).ok()).filter(|v| *v > 0);

        Self {
            page: positive(page).unwrap_or(DEFAULT_PAGE),
            limit: positive(limit).unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    /// Normalize raw query-string values. Anything that does not parse as an
    /// integer is treated as missing.
    #[must_use]
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let number = |value: Option<&str>| value.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(number(page), number(limit))
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of items before this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total matching items across all pages.
    pub total_items: u64,
    /// `ceil(total_items / limit)`.
    pub total_pages: u64,
    /// The requested page.
    pub current_page: u64,
    /// Page size.
    pub limit: u64,
    /// `current_page < total_pages`.
    pub has_next_page: bool,
    /// `current_page > 1`.
    pub has_prev_page: bool,
}

impl Pagination {
    /// Metadata for `request` over `total_items` items.
    #[must_use]
    pub const fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit);
        Self {
            total_items,
            total_pages,
            current_page: request.page,
            limit: request.limit,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

/// One page of tickets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketPage {
    /// Tickets on this page, newest first.
    pub tickets: Vec<Ticket>,
    /// Pagination metadata.
    pub pagination: Pagination,
}
