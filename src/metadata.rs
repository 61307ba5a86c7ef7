// src/metadata.rs

//! Pagination metadata for list responses.

// dependencies
use serde::Serialize;

/// Where a page of results sits within the full result set.
///
/// An empty result set is reported as all zeroes rather than as page 1 of 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: u32,
    pub page_size: u32,
    pub first_page: u32,
    pub last_page: u64,
    pub total_records: u64,
}

impl Metadata {
    /// Compute metadata for `total_records` rows split into pages of
    /// `page_size`. `page_size` must be non-zero, which validated filters
    /// guarantee.
    pub fn compute(total_records: u64, page: u32, page_size: u32) -> Self {
        if total_records == 0 {
            return Self::default();
        }
        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: total_records.div_ceil(u64::from(page_size)),
            total_records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}
