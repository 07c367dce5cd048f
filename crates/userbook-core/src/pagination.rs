//! Length-aware pagination types for list operations.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub per_page: u32,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_PER_PAGE: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Creates a new page request.
    ///
    /// The page is clamped to at least 1 and the size to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Creates a request for the first page.
    #[must_use]
    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(Self::DEFAULT_PER_PAGE)
    }
}

/// Information about a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PageInfo {
    /// The current page number (1-indexed).
    pub current_page: u32,
    /// The number of items per page.
    pub per_page: u32,
    /// The total number of items across all pages.
    pub total: u64,
    /// The number of the last page (at least 1).
    pub last_page: u64,
    /// Position of the first item on this page, if any.
    pub from: Option<u64>,
    /// Position of the last item on this page, if any.
    pub to: Option<u64>,
}

impl PageInfo {
    /// Creates a new page info.
    ///
    /// A zero page size, possible with a hand-built request, counts as 1.
    #[must_use]
    pub fn new(request: PageRequest, total: u64, number_of_items: usize) -> Self {
        let per_page = u64::from(request.per_page.max(1));
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if number_of_items == 0 {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + number_of_items as u64 - 1))
        };

        Self {
            current_page: request.page,
            per_page: request.per_page,
            total,
            last_page,
            from,
            to,
        }
    }
}

/// A page of results with the totals needed to render pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Information about this page.
    #[serde(flatten)]
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        let info = PageInfo::new(request, total, data.len());
        Self { data, info }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            info: self.info,
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the total number of items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.info.total
    }

    /// Returns the number of the last page.
    #[must_use]
    pub const fn last_page(&self) -> u64 {
        self.info.last_page
    }

    /// Returns true if there is a next page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.info.current_page as u64) < self.info.last_page
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
