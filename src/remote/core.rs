// ABOUTME: Core RemoteCatalog trait defining the unified remote-access contract
// ABOUTME: Every engine component consumes this trait instead of a concrete client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Remote Catalog Contract
//!
//! The [`RemoteCatalog`] trait is the single seam between the engine and the
//! remote meal-planning service. All operations are asynchronous and may
//! fail with a transport or decoding error ([`crate::errors::ErrorCode`]
//! `RemoteServiceError` / `RemoteDecodeError`); none of them panic.
//!
//! Components hold an `Arc<dyn RemoteCatalog>`, so the whole engine is
//! constructible and testable without I/O by injecting
//! [`crate::remote::FixtureCatalog`].

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{
    IngredientRequirement, InventoryItem, RecipeDetail, RecipeDraft, RecipeFilter, RecipeQuantity,
    RecipeSummary,
};
use crate::pagination::{Page, PageRequest};

/// Unified interface to the remote catalog, inventory, and list-resolution
/// service
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch one page of the unfiltered recipe listing
    async fn fetch_recipes(&self, request: PageRequest) -> AppResult<Page<RecipeSummary>>;

    /// Fetch one page of the filtered recipe listing
    async fn filter_recipes(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> AppResult<Page<RecipeSummary>>;

    /// Fetch the current user's favorite recipes
    async fn fetch_favorites(&self) -> AppResult<Vec<RecipeSummary>>;

    /// Mark a recipe as a favorite of the current user
    async fn add_favorite(&self, recipe_id: i64) -> AppResult<()>;

    /// Remove a recipe from the current user's favorites
    async fn remove_favorite(&self, recipe_id: i64) -> AppResult<()>;

    /// Fetch recipe suggestions derived for the current user
    async fn fetch_suggestions(&self) -> AppResult<Vec<RecipeSummary>>;

    /// Fetch the recipes owned by the current user
    async fn fetch_user_recipes(&self) -> AppResult<Vec<RecipeSummary>>;

    /// Fetch the full detail snapshot of one recipe
    async fn fetch_recipe_detail(&self, recipe_id: i64) -> AppResult<RecipeDetail>;

    /// Create a recipe from a validated draft, returning the stored summary
    async fn create_recipe(&self, draft: &RecipeDraft) -> AppResult<RecipeSummary>;

    /// Replace a recipe's content with a validated draft
    async fn update_recipe(&self, recipe_id: i64, draft: &RecipeDraft)
        -> AppResult<RecipeSummary>;

    /// Delete a recipe owned by the current user
    async fn delete_recipe(&self, recipe_id: i64) -> AppResult<()>;

    /// Fetch the full pantry inventory
    async fn fetch_inventory(&self) -> AppResult<Vec<InventoryItem>>;

    /// Apply a signed inventory delta: positive quantities add stock,
    /// negative quantities consume it. Missing ingredients are created,
    /// quantities never drop below zero.
    async fn apply_inventory_delta(&self, items: &[IngredientRequirement]) -> AppResult<()>;

    /// Server-side bulk aggregation of per-recipe requirements into gross
    /// ingredient totals
    async fn compute_ingredient_totals(
        &self,
        quantities: &[RecipeQuantity],
    ) -> AppResult<Vec<IngredientRequirement>>;

    /// Net aggregated totals against inventory, returning only positive
    /// deficits sorted by ingredient name
    async fn resolve_shopping_list(
        &self,
        totals: &[IngredientRequirement],
    ) -> AppResult<Vec<IngredientRequirement>>;
}
