//! Pagination rules for list reads.

/// Page size used when the request gives none or an invalid one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// A clamped, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Normalizes raw query values: a missing or non-positive page becomes 1,
    /// a missing or non-positive size becomes the default, and sizes above
    /// the maximum are capped.
    pub fn clamp(page: Option<i64>, page_size: Option<i64>, config: &ReaderConfig) -> Self {
        let page = match page {
            Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => {
                u32::try_from(s).map_or(config.max_page_size, |s| s.min(config.max_page_size))
            }
            _ => config.default_page_size,
        };
        Self { page, page_size }
    }

    /// Rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// A count scan is issued only when this page came back full or a later
    /// page was requested. Otherwise the row count is the total.
    pub fn needs_total_count(&self, rows_returned: usize) -> bool {
        rows_returned >= self.page_size as usize || self.page > 1
    }
}
