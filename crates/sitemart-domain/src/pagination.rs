//! Pagination for list endpoints.

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// One-based page request.
///
/// Out-of-range values are clamped rather than rejected: `per_page` to
/// 1–[`MAX_PER_PAGE`], `page` to ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(default_page(), default_per_page())
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            page: page.max(1),
        }
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page.clamp(1, MAX_PER_PAGE))
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * self.limit()
    }
}
