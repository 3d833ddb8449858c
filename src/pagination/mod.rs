//! Page envelopes and page-number URLs of the upstream list endpoints.

use serde::{Deserialize, Serialize};
use url::Url;

/// Items per page served by the list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page the server will hand out.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total items across all pages
    pub count: u64,

    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,

    /// Absolute URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,

    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn next_page(&self) -> Option<u32> {
        page_param_from_url(self.next.as_deref())
    }

    pub fn previous_page(&self) -> Option<u32> {
        page_param_from_url(self.previous.as_deref())
    }

    /// Number of pages at the given page size.
    pub fn page_count(&self, page_size: u32) -> u64 {
        let size = u64::from(page_size.max(1));
        self.count.div_ceil(size)
    }
}

/// Pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_sub(1) * self.page_size as usize
    }

    /// Slice one page out of a full collection.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.page_size as usize).min(items.len());
        &items[start..end]
    }
}

/// Page number carried by a `next`/`previous` URL.
///
/// None for a missing or unparseable URL; 1 when the URL has no `page`
/// parameter (the first page is served without one).
pub fn page_param_from_url(url: Option<&str>) -> Option<u32> {
    let url = Url::parse(url?).ok()?;
    match url.query_pairs().find(|(key, _)| key == "page") {
        Some((_, value)) => value.parse().ok(),
        None => Some(1),
    }
}

/// Path of a collection page, e.g. `/api/events/?page=2`.
pub fn collection_url(page: Option<u32>, collection: &str) -> String {
    match page {
        Some(p) if p > 1 => format!("/api/{}/?page={}", collection, p),
        _ => format!("/api/{}/", collection),
    }
}
