// ABOUTME: Pagination state machine for one catalog branch
// ABOUTME: Serializes fetches per branch and discards stale results via generation tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Catalog Branch State
//!
//! Each independently paginated recipe list (browse, filtered) is a
//! *branch*. A branch moves through `idle → loading → finished` for its
//! first page and `finished → fetching → finished` for subsequent pages.
//! Only the `idle` and `finished` states accept a new operation, which
//! guarantees at most one in-flight fetch per branch and therefore that a
//! stale response can never overwrite a fresher one within the branch.
//!
//! There is no cancellation: a fetch superseded by a reset runs to
//! completion and is discarded because its generation tag no longer matches
//! the branch.

use crate::models::RecipeSummary;
use crate::pagination::{Page, FIRST_PAGE};

/// Lifecycle phase of a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchPhase {
    /// Nothing fetched yet
    Idle,
    /// First page fetch in flight
    Loading,
    /// Subsequent page fetch in flight
    Fetching,
    /// No fetch in flight; data (or an error) is available
    Finished,
}

/// Read-only snapshot of a branch for UI callers
#[derive(Debug, Clone)]
pub struct BranchSnapshot {
    /// Items fetched so far, in server order
    pub items: Vec<RecipeSummary>,
    /// Page the cursor currently points at (0 before any fetch)
    pub page: u32,
    /// Total page count reported by the server, unknown before first fetch
    pub total_pages: Option<u32>,
    /// Whether a first-page fetch is in flight
    pub loading: bool,
    /// Whether a subsequent-page fetch is in flight
    pub fetching: bool,
    /// Error from the most recent failed fetch, cleared on success
    pub error: Option<String>,
}

/// One independently paginated catalog branch
#[derive(Debug)]
pub(crate) struct Branch {
    items: Vec<RecipeSummary>,
    page: u32,
    total_pages: Option<u32>,
    phase: BranchPhase,
    generation: u64,
    error: Option<String>,
    /// Cursor and total-page state to restore if the in-flight fetch fails,
    /// so a failure never leaves the cursor out of step with the items
    rollback: Option<(u32, Option<u32>)>,
}

impl Branch {
    pub(crate) const fn new() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            total_pages: None,
            phase: BranchPhase::Idle,
            generation: 0,
            error: None,
            rollback: None,
        }
    }

    /// Whether the branch is in a state that permits a reset-triggering
    /// operation
    const fn can_reset(&self) -> bool {
        matches!(self.phase, BranchPhase::Idle | BranchPhase::Finished)
    }

    /// Whether the forward cursor has consumed every server page
    fn end_reached(&self) -> bool {
        self.total_pages.is_some_and(|total| self.page >= total)
    }

    /// Begin a first-page fetch, returning its generation tag.
    ///
    /// Returns `None` while another fetch is in flight. The cursor and the
    /// total-page count reset; the item vector is only replaced once the
    /// fetch succeeds, and a failure restores the pre-reset cursor, so prior
    /// data stays visible with a cursor that still matches it.
    pub(crate) fn begin_first_page(&mut self) -> Option<u64> {
        if !self.can_reset() {
            return None;
        }
        Some(self.reset_and_begin())
    }

    /// Unconditionally reset the branch and begin a first-page fetch,
    /// superseding any fetch in flight (its result is discarded by
    /// generation tag). Used by filter changes and mutation reloads.
    pub(crate) fn reset_and_begin(&mut self) -> u64 {
        self.generation += 1;
        self.rollback = Some((self.page, self.total_pages));
        self.page = FIRST_PAGE;
        self.total_pages = None;
        self.phase = BranchPhase::Loading;
        self.generation
    }

    /// Begin a next-page fetch, returning the generation tag and the page to
    /// request. `None` when a fetch is in flight or the end is reached.
    ///
    /// The cursor increments eagerly and is rolled back on failure, so a
    /// retry requests the same page again.
    pub(crate) fn begin_next_page(&mut self) -> Option<(u64, u32)> {
        if self.phase != BranchPhase::Finished || self.end_reached() {
            return None;
        }
        self.rollback = Some((self.page, self.total_pages));
        self.page += 1;
        self.phase = BranchPhase::Fetching;
        Some((self.generation, self.page))
    }

    /// Apply a successful first-page response. Discarded when the generation
    /// tag is stale.
    pub(crate) fn complete_first_page(&mut self, generation: u64, page: Page<RecipeSummary>) {
        if generation != self.generation || self.phase != BranchPhase::Loading {
            return;
        }
        self.items = page.items;
        self.total_pages = Some(page.total_pages);
        self.phase = BranchPhase::Finished;
        self.error = None;
        self.rollback = None;
    }

    /// Append a successful next-page response. Discarded when the generation
    /// tag is stale.
    pub(crate) fn complete_next_page(&mut self, generation: u64, page: Page<RecipeSummary>) {
        if generation != self.generation || self.phase != BranchPhase::Fetching {
            return;
        }
        self.items.extend(page.items);
        self.total_pages = Some(page.total_pages);
        self.phase = BranchPhase::Finished;
        self.error = None;
        self.rollback = None;
    }

    /// Record a failed fetch. Prior items stay untouched and the cursor and
    /// total-page state roll back to their pre-fetch values; no partial
    /// results are committed.
    pub(crate) fn fail(&mut self, generation: u64, message: String) {
        if generation != self.generation {
            return;
        }
        if let Some((page, total_pages)) = self.rollback.take() {
            self.page = page;
            self.total_pages = total_pages;
        }
        self.phase = BranchPhase::Finished;
        self.error = Some(message);
    }

    /// Invalidate the branch so an in-flight fetch (if any) is discarded and
    /// the next first-page fetch is accepted. Used by mutation-triggered
    /// reloads.
    pub(crate) fn invalidate(&mut self) {
        self.generation += 1;
        self.phase = BranchPhase::Idle;
        self.rollback = None;
    }

    /// Flip the favorite flag and count of the given recipe, if present.
    /// Flag and count always move together by exactly one.
    pub(crate) fn flip_favorite(&mut self, recipe_id: i64) -> Option<bool> {
        let recipe = self.items.iter_mut().find(|r| r.id == recipe_id)?;
        if recipe.is_favorite {
            recipe.is_favorite = false;
            recipe.favorite_count = recipe.favorite_count.saturating_sub(1);
        } else {
            recipe.is_favorite = true;
            recipe.favorite_count += 1;
        }
        Some(recipe.is_favorite)
    }

    pub(crate) fn find(&self, recipe_id: i64) -> Option<&RecipeSummary> {
        self.items.iter().find(|r| r.id == recipe_id)
    }

    pub(crate) fn snapshot(&self) -> BranchSnapshot {
        BranchSnapshot {
            items: self.items.clone(),
            page: self.page,
            total_pages: self.total_pages,
            loading: self.phase == BranchPhase::Loading,
            fetching: self.phase == BranchPhase::Fetching,
            error: self.error.clone(),
        }
    }
}
