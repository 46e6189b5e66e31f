//! Page/limit pagination primitives for complaint listings.
//!
//! The backend and the client gateway share these types so the wire shape of
//! the `pagination` object (`total`, `page`, `totalPages`, `limit`) is defined
//! in exactly one place. A [`PageRequest`] validates the caller-supplied page
//! number and page size and derives the row offset; [`PageInfo`] describes the
//! result window; [`Paged`] bundles a page of items with that description.

use serde::{Deserialize, Serialize};

/// Default page number when the caller omits one.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the caller omits one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound on the page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Validation errors raised while constructing a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page numbers are one-based; zero is rejected rather than clamped.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A zero limit would make every listing empty and total pages undefined.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// Requested page size exceeds the service maximum.
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// The configured maximum page size.
        max: u32,
    },
}

/// Validated page window requested by a caller.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(Some(3), Some(20)).unwrap();
/// assert_eq!(request.offset(), 40);
///
/// let defaults = PageRequest::default();
/// assert_eq!((defaults.page(), defaults.limit()), (1, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from optional query parameters, applying the 1/10
    /// defaults for absent values.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { page, limit })
    }

    /// One-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the first item of this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Description of a result window, serialized as the `pagination` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total number of matching items across all pages.
    pub total: u64,
    /// The page this window describes (one-based).
    pub page: u32,
    /// Number of pages needed to cover `total` items.
    pub total_pages: u64,
    /// Page size used to compute the window.
    pub limit: u32,
}

impl PageInfo {
    /// Describe the window produced by `request` over `total` matching items.
    ///
    /// An empty result set has zero pages rather than one, matching the count
    /// a client would render for "page X of Y".
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page(),
            total_pages: total.div_ceil(u64::from(request.limit())),
            limit: request.limit(),
        }
    }
}

/// One page of items together with its window description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// Items on this page, in listing order.
    pub items: Vec<T>,
    /// Window description for the listing as a whole.
    pub info: PageInfo,
}

impl<T> Paged<T> {
    /// Bundle a page of items with the window derived from `request`.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            info: PageInfo::new(request, total),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 10, 0)]
    #[case(Some(1), Some(10), 1, 10, 0)]
    #[case(Some(3), Some(10), 3, 10, 20)]
    #[case(Some(2), Some(25), 2, 25, 25)]
    fn request_applies_defaults_and_offset(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
        #[case] expected_offset: u64,
    ) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
        assert_eq!(request.offset(), expected_offset);
    }

    #[rstest]
    #[case(Some(0), None, PageRequestError::ZeroPage)]
    #[case(None, Some(0), PageRequestError::ZeroLimit)]
    #[case(None, Some(MAX_LIMIT + 1), PageRequestError::LimitTooLarge { max: MAX_LIMIT })]
    fn request_rejects_invalid_windows(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected: PageRequestError,
    ) {
        let err = PageRequest::new(page, limit).expect_err("invalid request");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(25, 10, 3)]
    #[case(30, 10, 3)]
    #[case(1, 10, 1)]
    #[case(0, 10, 0)]
    fn info_rounds_total_pages_up(
        #[case] total: u64,
        #[case] limit: u32,
        #[case] expected_pages: u64,
    ) {
        let request = PageRequest::new(None, Some(limit)).expect("valid request");
        let info = PageInfo::new(request, total);
        assert_eq!(info.total_pages, expected_pages);
        assert_eq!(info.total, total);
    }

    #[test]
    fn info_serializes_camel_case() {
        let request = PageRequest::default();
        let info = PageInfo::new(request, 25);
        let value = serde_json::to_value(info).expect("serializable");
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["total"], 25);
        assert_eq!(value["page"], 1);
        assert_eq!(value["limit"], 10);
    }
}
