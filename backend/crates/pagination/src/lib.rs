//! Page/limit pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] is validated once at the inbound boundary and then
//! handed to persistence adapters, which use [`PageRequest::offset`] and
//! [`PageRequest::limit`] to build `LIMIT`/`OFFSET` clauses. Results travel
//! back wrapped in a [`Paginated`] envelope whose [`PageMeta`] carries the
//! true row count, so clients can render page controls without guessing.
//!
//! # Examples
//! ```
//! use pagination::{PageMeta, PageRequest, Paginated};
//!
//! let request = PageRequest::new(Some(2), Some(10), 100).expect("valid page");
//! assert_eq!(request.offset(), 10);
//!
//! let page = Paginated::new(vec!["a", "b"], PageMeta::new(request, 12));
//! assert_eq!(page.pagination().total_pages(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 20;

/// Validation failures for page and limit inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    PageTooSmall,
    /// The limit falls outside `1..=max`.
    #[error("limit must be between 1 and {max}")]
    LimitOutOfRange {
        /// Largest accepted limit.
        max: u32,
    },
}

/// Validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate raw inputs, applying [`DEFAULT_PAGE`] and [`DEFAULT_LIMIT`]
    /// when they are absent.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `limit` is zero or
    /// above `max_limit`.
    pub const fn new(
        page: Option<u32>,
        limit: Option<u32>,
        max_limit: u32,
    ) -> Result<Self, PageRequestError> {
        let page_number = match page {
            Some(value) => value,
            None => DEFAULT_PAGE,
        };
        let page_size = match limit {
            Some(value) => value,
            None => DEFAULT_LIMIT,
        };
        if page_number == 0 {
            return Err(PageRequestError::PageTooSmall);
        }
        if page_size == 0 || page_size > max_limit {
            return Err(PageRequestError::LimitOutOfRange { max: max_limit });
        }
        Ok(Self {
            page: page_number,
            limit: page_size,
        })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64)
            .saturating_sub(1)
            .saturating_mul(self.limit as u64)
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

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u64,
}

impl PageMeta {
    /// Build metadata for `request` given the total number of matching rows.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(request.limit as u64),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Total number of rows across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages needed to show every row.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }
}

/// A page of results with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    data: Vec<T>,
    pagination: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap `data` with its pagination metadata.
    #[must_use]
    pub const fn new(data: Vec<T>, pagination: PageMeta) -> Self {
        Self { data, pagination }
    }

    /// Rows on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Pagination metadata.
    #[must_use]
    pub const fn pagination(&self) -> &PageMeta {
        &self.pagination
    }

    /// Convert every row, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    /// Split into rows and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        (self.data, self.pagination)
    }
}
