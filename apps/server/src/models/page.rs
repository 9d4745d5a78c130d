//! Pagination request and response envelope

use super::ProductDocument;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Deepest hit offset ever requested from a search engine.
pub const MAX_ENGINE_OFFSET: usize = u32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Build a page request, rejecting `page < 1` and `page_size` outside `[1, max_page_size]`.
    pub fn new(page: usize, page_size: usize, max_page_size: usize) -> Result<Self> {
        if page < 1 {
            return Err(Error::Validation(
                "'page' must be greater than or equal to 1".to_string(),
            ));
        }
        if page_size < 1 || page_size > max_page_size {
            return Err(Error::Validation(format!(
                "'page_size' must be between 1 and {max_page_size}"
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Whether an engine can be asked for this page directly.
    ///
    /// Deeper pages cannot hold hits of any realistic result; callers fetch
    /// the first page for its total and let [`Self::ensure_in_range`] decide.
    pub fn is_addressable(&self) -> bool {
        (self.page - 1)
            .checked_mul(self.page_size)
            .is_some_and(|offset| offset <= MAX_ENGINE_OFFSET)
    }

    /// The first page at the same page size.
    pub fn first(&self) -> Self {
        Self { page: 1, ..*self }
    }

    /// `ceil(total_items / page_size)`, with an empty result counting as one page.
    pub fn total_pages(&self, total_items: u64) -> u64 {
        if total_items == 0 {
            return 1;
        }
        total_items.div_ceil(self.page_size as u64)
    }

    /// Fails when the page lies past the last page of a non-empty result.
    pub fn ensure_in_range(&self, total_items: u64) -> Result<u64> {
        let total_pages = self.total_pages(total_items);
        if total_items > 0 && self.page as u64 > total_pages {
            return Err(Error::NotFound(format!(
                "Page {} does not exist. Last page is {}.",
                self.page, total_pages
            )));
        }
        Ok(total_pages)
    }
}

/// Uniform response body of every search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult {
    pub page: usize,
    pub page_size: usize,
    pub total_items: u64,
    pub total_pages: u64,
    /// Elapsed milliseconds, two decimals
    pub time: f64,
    pub data: Vec<ProductDocument>,
}

/// Round a millisecond measurement to two decimals for response bodies.
pub fn round_ms(duration: std::time::Duration) -> f64 {
    (duration.as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}
