// ABOUTME: Page-numbered pagination types for the remote recipe catalog
// ABOUTME: Provides Page responses and PageRequest parameters shared by all catalog branches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Page-numbered pagination for the catalog protocol.
//!
//! The remote catalog speaks classic numbered pages starting at 1. Branches
//! request pages in strictly increasing order with no gaps; the total page
//! count reported by the server is re-read from every response.

use serde::{Deserialize, Serialize};

/// First page number of any branch
pub const FIRST_PAGE: u32 = 1;

/// Default page size when the configuration does not override it
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Paginated response containing items and pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this page
    pub items: Vec<T>,
    /// The 1-based page number this response covers
    pub page: u32,
    /// Total number of pages on the server for this query
    pub total_pages: u32,
    /// Total number of items on the server for this query
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Create a new page
    #[must_use]
    pub const fn new(items: Vec<T>, page: u32, total_pages: u32, total_items: u64) -> Self {
        Self { items, page, total_pages, total_items }
    }

    /// Create an empty single-page response
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: FIRST_PAGE,
            total_pages: 0,
            total_items: 0,
        }
    }

    /// Whether a later page exists after this one
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Request parameters for one page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub per_page: u32,
}

impl PageRequest {
    /// Request the first page
    #[must_use]
    pub const fn first(per_page: u32) -> Self {
        Self { page: FIRST_PAGE, per_page }
    }

    /// Request the page following this one
    #[must_use]
    pub const fn next(&self) -> Self {
        Self { page: self.page + 1, per_page: self.per_page }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PER_PAGE)
    }
}
