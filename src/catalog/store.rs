// ABOUTME: Catalog store presenting paginated recipe branches and derived lists
// ABOUTME: Owns page cursors, in-flight fetch guards, and mutation-triggered reloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Recipe Catalog Store
//!
//! Presents a forward-growing sequence of recipe summaries from the remote
//! paginated endpoint, plus an independently paginated filtered branch and
//! derived lists (favorites, suggestions, user-owned).
//!
//! UI callers read immutable [`BranchSnapshot`] values and dispatch intents
//! through the store's methods; no mutable state is ever handed out.
//!
//! Pagination fetch failures are surfaced through the branch error flag, not
//! returned, so a render loop can observe them. Recipe mutations return
//! their errors directly because the caller owns the form being submitted.

use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use super::branch::{Branch, BranchSnapshot};
use crate::errors::AppResult;
use crate::models::{RecipeDetail, RecipeDraft, RecipeFilter, RecipeSummary};
use crate::pagination::PageRequest;
use crate::remote::RemoteCatalog;

/// Paginated, optionally filtered view over the remote recipe catalog
pub struct CatalogStore {
    remote: std::sync::Arc<dyn RemoteCatalog>,
    per_page: u32,
    browse: RwLock<Branch>,
    filtered: RwLock<Branch>,
    filter: RwLock<Option<RecipeFilter>>,
    favorites: RwLock<Vec<RecipeSummary>>,
    suggestions: RwLock<Vec<RecipeSummary>>,
    user_recipes: RwLock<Vec<RecipeSummary>>,
}

impl CatalogStore {
    /// Create a store over the given remote collaborator
    #[must_use]
    pub fn new(remote: std::sync::Arc<dyn RemoteCatalog>, per_page: u32) -> Self {
        Self {
            remote,
            per_page,
            browse: RwLock::new(Branch::new()),
            filtered: RwLock::new(Branch::new()),
            filter: RwLock::new(None),
            favorites: RwLock::new(Vec::new()),
            suggestions: RwLock::new(Vec::new()),
            user_recipes: RwLock::new(Vec::new()),
        }
    }

    /// Load (or reload) the first page of the unfiltered browse list.
    ///
    /// Silently ignored while a browse fetch is in flight. A failed fetch
    /// records the branch error without clearing prior data.
    pub async fn load_first_page(&self) {
        let Some(generation) = self
            .browse
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .begin_first_page()
        else {
            debug!("browse first-page load refused: fetch in flight");
            return;
        };

        let result = self.remote.fetch_recipes(PageRequest::first(self.per_page)).await;
        let mut branch = self.browse.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(page) => branch.complete_first_page(generation, page),
            Err(e) => {
                warn!(error = %e, "browse first-page fetch failed");
                branch.fail(generation, e.to_string());
            }
        }
    }

    /// Load the next page of the unfiltered browse list.
    ///
    /// No-op at the end of pagination or while a fetch is in flight. A
    /// failure leaves the cursor incremented and appends nothing.
    pub async fn load_next_page(&self) {
        let Some((generation, page)) = self
            .browse
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .begin_next_page()
        else {
            debug!("browse next-page load refused: in flight or end reached");
            return;
        };

        let request = PageRequest { page, per_page: self.per_page };
        let result = self.remote.fetch_recipes(request).await;
        let mut branch = self.browse.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(page) => branch.complete_next_page(generation, page),
            Err(e) => {
                warn!(error = %e, "browse next-page fetch failed");
                branch.fail(generation, e.to_string());
            }
        }
    }

    /// Apply a filter and load the first page of the filtered branch.
    ///
    /// Resets only the filtered branch; the unfiltered browse list is left
    /// untouched. An outstanding filtered fetch is superseded (its result
    /// will be discarded by generation tag).
    pub async fn apply_filter(&self, filter: RecipeFilter) {
        *self.filter.write().unwrap_or_else(PoisonError::into_inner) = Some(filter.clone());

        let generation = self
            .filtered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .reset_and_begin();

        let result = self
            .remote
            .filter_recipes(&filter, PageRequest::first(self.per_page))
            .await;
        let mut branch = self.filtered.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(page) => branch.complete_first_page(generation, page),
            Err(e) => {
                warn!(error = %e, "filtered first-page fetch failed");
                branch.fail(generation, e.to_string());
            }
        }
    }

    /// Load the next page of the filtered branch. No-op when no filter is
    /// active, at the end of pagination, or while a fetch is in flight.
    pub async fn load_next_filtered_page(&self) {
        let Some(filter) = self
            .filter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        else {
            return;
        };
        let Some((generation, page)) = self
            .filtered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .begin_next_page()
        else {
            return;
        };

        let request = PageRequest { page, per_page: self.per_page };
        let result = self.remote.filter_recipes(&filter, request).await;
        let mut branch = self.filtered.write().unwrap_or_else(PoisonError::into_inner);
        match result {
            Ok(page) => branch.complete_next_page(generation, page),
            Err(e) => {
                warn!(error = %e, "filtered next-page fetch failed");
                branch.fail(generation, e.to_string());
            }
        }
    }

    /// Stop consulting the filtered branch. Its data is retained, so
    /// re-applying the same filter later starts from a reset, not a loss.
    pub fn clear_filter(&self) {
        *self.filter.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a filter is currently active
    #[must_use]
    pub fn filter_active(&self) -> bool {
        self.filter
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Snapshot of the unfiltered browse branch
    #[must_use]
    pub fn browse_snapshot(&self) -> BranchSnapshot {
        self.browse
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Snapshot of the filtered branch
    #[must_use]
    pub fn filtered_snapshot(&self) -> BranchSnapshot {
        self.filtered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Snapshot of whichever branch the user is currently looking at
    #[must_use]
    pub fn visible_snapshot(&self) -> BranchSnapshot {
        if self.filter_active() {
            self.filtered_snapshot()
        } else {
            self.browse_snapshot()
        }
    }

    /// Find a recipe in the currently visible branch
    #[must_use]
    pub fn find_visible(&self, recipe_id: i64) -> Option<RecipeSummary> {
        if self.filter_active() {
            self.filtered
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .find(recipe_id)
                .cloned()
        } else {
            self.browse
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .find(recipe_id)
                .cloned()
        }
    }

    /// Flip the favorite flag and count of a recipe in the visible branch.
    ///
    /// Returns the new favorite state, or `None` when the recipe is not
    /// visible (the toggle is then a no-op). This is the store-level
    /// mutation the favorite reconciler builds on; calling it twice restores
    /// the original state.
    pub fn flip_visible_favorite(&self, recipe_id: i64) -> Option<bool> {
        if self.filter_active() {
            self.filtered
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .flip_favorite(recipe_id)
        } else {
            self.browse
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .flip_favorite(recipe_id)
        }
    }

    /// The current user's favorite recipes, as last reconciled
    #[must_use]
    pub fn favorites(&self) -> Vec<RecipeSummary> {
        self.favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recipe suggestions, as last reconciled
    #[must_use]
    pub fn suggestions(&self) -> Vec<RecipeSummary> {
        self.suggestions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current user's own recipes, as last reconciled
    #[must_use]
    pub fn user_recipes(&self) -> Vec<RecipeSummary> {
        self.user_recipes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-fetch the favorite-derived lists (favorites, suggestions, user
    /// recipes) from the remote source
    pub async fn refresh_derived_lists(&self) -> AppResult<()> {
        let favorites = self.remote.fetch_favorites().await?;
        let suggestions = self.remote.fetch_suggestions().await?;
        let user_recipes = self.remote.fetch_user_recipes().await?;
        *self.favorites.write().unwrap_or_else(PoisonError::into_inner) = favorites;
        *self.suggestions.write().unwrap_or_else(PoisonError::into_inner) = suggestions;
        *self.user_recipes.write().unwrap_or_else(PoisonError::into_inner) = user_recipes;
        Ok(())
    }

    /// Discard the browse branch (superseding any in-flight fetch) and load
    /// it from scratch
    pub async fn reload_browse(&self) {
        self.browse
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidate();
        self.load_first_page().await;
    }

    /// Fetch the full detail snapshot of a recipe; not cached
    pub async fn recipe_detail(&self, recipe_id: i64) -> AppResult<RecipeDetail> {
        self.remote.fetch_recipe_detail(recipe_id).await
    }

    /// Create a recipe from a draft and reload the browse list.
    ///
    /// The local list's shape is never speculated on: success always forces
    /// a full reset-and-reload for eventual consistency with the remote
    /// source.
    pub async fn create_recipe(&self, draft: &RecipeDraft) -> AppResult<RecipeSummary> {
        draft.validate()?;
        let summary = self.remote.create_recipe(draft).await?;
        self.reload_browse().await;
        Ok(summary)
    }

    /// Update a recipe from a draft and reload the browse list
    pub async fn update_recipe(
        &self,
        recipe_id: i64,
        draft: &RecipeDraft,
    ) -> AppResult<RecipeSummary> {
        draft.validate()?;
        let summary = self.remote.update_recipe(recipe_id, draft).await?;
        self.reload_browse().await;
        Ok(summary)
    }

    /// Delete a recipe and reload the browse list
    pub async fn delete_recipe(&self, recipe_id: i64) -> AppResult<()> {
        self.remote.delete_recipe(recipe_id).await?;
        self.reload_browse().await;
        Ok(())
    }

    pub(crate) fn remote(&self) -> std::sync::Arc<dyn RemoteCatalog> {
        std::sync::Arc::clone(&self.remote)
    }
}
