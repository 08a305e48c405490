// ABOUTME: In-memory fixture implementation of the RemoteCatalog trait
// ABOUTME: Provides deterministic data, fault injection, and call counting for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Fixture Catalog
//!
//! An in-memory catalog double for development, testing, and demonstration.
//! Unlike [`HttpCatalog`](crate::remote::HttpCatalog), the fixture:
//!
//! - requires no network or authentication
//! - serves deterministic data seeded by the test
//! - supports fault injection (`fail_on`) for failure-path tests
//! - counts invocations per operation (`call_count`) so tests can assert
//!   how many remote calls were honored
//! - can simulate latency so tests can overlap in-flight fetches
//!
//! All data access is protected by `RwLock`; locks are never held across an
//! await point.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use super::core::RemoteCatalog;
use crate::errors::{AppError, AppResult};
use crate::models::{
    IngredientRequirement, InventoryItem, RecipeDetail, RecipeDraft, RecipeFilter, RecipeQuantity,
    RecipeSummary,
};
use crate::pagination::{Page, PageRequest};

/// Quantities smaller than this are treated as fully covered by inventory
const DEFICIT_EPSILON: f64 = 1e-9;

/// In-memory catalog service double
pub struct FixtureCatalog {
    recipes: RwLock<Vec<RecipeDetail>>,
    suggestion_ids: RwLock<Vec<i64>>,
    inventory: RwLock<Vec<InventoryItem>>,
    owner_id: i64,
    next_id: AtomicI64,
    failures: RwLock<HashSet<String>>,
    calls: RwLock<HashMap<String, u32>>,
    latency: RwLock<Option<Duration>>,
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureCatalog {
    /// Create an empty fixture; the current user has id 1
    #[must_use]
    pub fn new() -> Self {
        Self {
            recipes: RwLock::new(Vec::new()),
            suggestion_ids: RwLock::new(Vec::new()),
            inventory: RwLock::new(Vec::new()),
            owner_id: 1,
            next_id: AtomicI64::new(1),
            failures: RwLock::new(HashSet::new()),
            calls: RwLock::new(HashMap::new()),
            latency: RwLock::new(None),
        }
    }

    /// Create a fixture pre-loaded with recipe details
    #[must_use]
    pub fn with_recipes(recipes: Vec<RecipeDetail>) -> Self {
        let next_id = recipes.iter().map(|r| r.summary.id).max().unwrap_or(0) + 1;
        let fixture = Self::new();
        fixture.next_id.store(next_id, Ordering::SeqCst);
        *fixture.recipes.write().unwrap_or_else(std::sync::PoisonError::into_inner) = recipes;
        fixture
    }

    /// Replace the pantry inventory
    pub fn set_inventory(&self, items: Vec<InventoryItem>) {
        *self.inventory.write().unwrap_or_else(std::sync::PoisonError::into_inner) = items;
    }

    /// Replace the suggested recipe ids
    pub fn set_suggestions(&self, recipe_ids: Vec<i64>) {
        *self
            .suggestion_ids
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = recipe_ids;
    }

    /// Make every subsequent call to `operation` fail until
    /// [`clear_failures`](Self::clear_failures) is called
    pub fn fail_on(&self, operation: &str) {
        self.failures
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(operation.to_owned());
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.failures
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    /// Delay every operation by `duration`, letting tests overlap fetches
    pub fn set_latency(&self, duration: Option<Duration>) {
        *self.latency.write().unwrap_or_else(std::sync::PoisonError::into_inner) = duration;
    }

    /// How many times `operation` was invoked (honored or failed)
    #[must_use]
    pub fn call_count(&self, operation: &str) -> u32 {
        self.calls
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    /// Record the invocation, simulate latency, and apply injected failures
    async fn begin(&self, operation: &str) -> AppResult<()> {
        let pause = {
            let mut calls = self
                .calls
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *calls.entry(operation.to_owned()).or_insert(0) += 1;
            *self
                .latency
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        };
        if let Some(duration) = pause {
            tokio::time::sleep(duration).await;
        }
        let failing = self
            .failures
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(operation);
        if failing {
            return Err(AppError::remote_service(format!(
                "injected failure for {operation}"
            )));
        }
        Ok(())
    }

    fn summaries(&self) -> Vec<RecipeSummary> {
        self.recipes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|d| d.summary.clone())
            .collect()
    }

    fn page_of(items: Vec<RecipeSummary>, request: PageRequest) -> Page<RecipeSummary> {
        let total_items = items.len() as u64;
        let per_page = request.per_page.max(1) as usize;
        let total_pages = items.len().div_ceil(per_page) as u32;
        let start = (request.page.saturating_sub(1) as usize) * per_page;
        let page_items = items.into_iter().skip(start).take(per_page).collect();
        Page::new(page_items, request.page, total_pages, total_items)
    }
}

#[async_trait]
impl RemoteCatalog for FixtureCatalog {
    async fn fetch_recipes(&self, request: PageRequest) -> AppResult<Page<RecipeSummary>> {
        self.begin("fetch_recipes").await?;
        Ok(Self::page_of(self.summaries(), request))
    }

    async fn filter_recipes(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> AppResult<Page<RecipeSummary>> {
        self.begin("filter_recipes").await?;
        let matching = self
            .summaries()
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        Ok(Self::page_of(matching, request))
    }

    async fn fetch_favorites(&self) -> AppResult<Vec<RecipeSummary>> {
        self.begin("fetch_favorites").await?;
        Ok(self.summaries().into_iter().filter(|r| r.is_favorite).collect())
    }

    async fn add_favorite(&self, recipe_id: i64) -> AppResult<()> {
        self.begin("add_favorite").await?;
        let mut recipes = self
            .recipes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let recipe = recipes
            .iter_mut()
            .find(|r| r.summary.id == recipe_id)
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;
        if !recipe.summary.is_favorite {
            recipe.summary.is_favorite = true;
            recipe.summary.favorite_count += 1;
        }
        Ok(())
    }

    async fn remove_favorite(&self, recipe_id: i64) -> AppResult<()> {
        self.begin("remove_favorite").await?;
        let mut recipes = self
            .recipes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let recipe = recipes
            .iter_mut()
            .find(|r| r.summary.id == recipe_id)
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;
        if recipe.summary.is_favorite {
            recipe.summary.is_favorite = false;
            recipe.summary.favorite_count = recipe.summary.favorite_count.saturating_sub(1);
        }
        Ok(())
    }

    async fn fetch_suggestions(&self) -> AppResult<Vec<RecipeSummary>> {
        self.begin("fetch_suggestions").await?;
        let ids = self
            .suggestion_ids
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        let summaries = self.summaries();
        Ok(ids
            .into_iter()
            .filter_map(|id| summaries.iter().find(|r| r.id == id).cloned())
            .collect())
    }

    async fn fetch_user_recipes(&self) -> AppResult<Vec<RecipeSummary>> {
        self.begin("fetch_user_recipes").await?;
        Ok(self
            .summaries()
            .into_iter()
            .filter(|r| r.owner_id == self.owner_id)
            .collect())
    }

    async fn fetch_recipe_detail(&self, recipe_id: i64) -> AppResult<RecipeDetail> {
        self.begin("fetch_recipe_detail").await?;
        self.recipes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .find(|r| r.summary.id == recipe_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> AppResult<RecipeSummary> {
        self.begin("create_recipe").await?;
        draft.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let summary = RecipeSummary {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            prep_time_minutes: draft.prep_time_minutes,
            allergens: draft.allergens.clone(),
            owner_id: self.owner_id,
            is_favorite: false,
            favorite_count: 0,
        };
        let detail = RecipeDetail {
            summary: summary.clone(),
            guide_steps: draft.guide_steps.clone(),
            ingredients: draft.ingredients.clone(),
        };
        self.recipes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(detail);
        Ok(summary)
    }

    async fn update_recipe(
        &self,
        recipe_id: i64,
        draft: &RecipeDraft,
    ) -> AppResult<RecipeSummary> {
        self.begin("update_recipe").await?;
        draft.validate()?;
        let mut recipes = self
            .recipes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let recipe = recipes
            .iter_mut()
            .find(|r| r.summary.id == recipe_id)
            .ok_or_else(|| AppError::not_found(format!("recipe {recipe_id}")))?;
        recipe.summary.name = draft.name.clone();
        recipe.summary.description = draft.description.clone();
        recipe.summary.prep_time_minutes = draft.prep_time_minutes;
        recipe.summary.allergens = draft.allergens.clone();
        recipe.guide_steps = draft.guide_steps.clone();
        recipe.ingredients = draft.ingredients.clone();
        Ok(recipe.summary.clone())
    }

    async fn delete_recipe(&self, recipe_id: i64) -> AppResult<()> {
        self.begin("delete_recipe").await?;
        let mut recipes = self
            .recipes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = recipes.len();
        recipes.retain(|r| r.summary.id != recipe_id);
        if recipes.len() == before {
            return Err(AppError::not_found(format!("recipe {recipe_id}")));
        }
        Ok(())
    }

    async fn fetch_inventory(&self) -> AppResult<Vec<InventoryItem>> {
        self.begin("fetch_inventory").await?;
        Ok(self
            .inventory
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    async fn apply_inventory_delta(&self, items: &[IngredientRequirement]) -> AppResult<()> {
        self.begin("apply_inventory_delta").await?;
        let mut inventory = self
            .inventory
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for delta in items {
            match inventory
                .iter_mut()
                .find(|i| i.ingredient_id == delta.ingredient_id)
            {
                Some(existing) => {
                    existing.quantity = (existing.quantity + delta.quantity).max(0.0);
                }
                None => inventory.push(InventoryItem {
                    ingredient_id: delta.ingredient_id,
                    name: delta.name.clone(),
                    quantity: delta.quantity.max(0.0),
                    unit: delta.unit,
                }),
            }
        }
        Ok(())
    }

    async fn compute_ingredient_totals(
        &self,
        quantities: &[RecipeQuantity],
    ) -> AppResult<Vec<IngredientRequirement>> {
        self.begin("compute_ingredient_totals").await?;
        let recipes = self
            .recipes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut totals: Vec<IngredientRequirement> = Vec::new();
        for quantity in quantities {
            let recipe = recipes
                .iter()
                .find(|r| r.summary.id == quantity.recipe_id)
                .ok_or_else(|| AppError::not_found(format!("recipe {}", quantity.recipe_id)))?;
            for ingredient in &recipe.ingredients {
                let scaled = ingredient.quantity * f64::from(quantity.count);
                match totals
                    .iter_mut()
                    .find(|t| t.ingredient_id == ingredient.ingredient_id)
                {
                    Some(total) => total.quantity += scaled,
                    None => totals.push(IngredientRequirement {
                        ingredient_id: ingredient.ingredient_id,
                        name: ingredient.name.clone(),
                        quantity: scaled,
                        unit: ingredient.unit,
                    }),
                }
            }
        }
        Ok(totals)
    }

    async fn resolve_shopping_list(
        &self,
        totals: &[IngredientRequirement],
    ) -> AppResult<Vec<IngredientRequirement>> {
        self.begin("resolve_shopping_list").await?;
        let inventory = self
            .inventory
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut deficits: Vec<IngredientRequirement> = totals
            .iter()
            .filter_map(|total| {
                let on_hand = inventory
                    .iter()
                    .find(|i| i.ingredient_id == total.ingredient_id)
                    .map_or(0.0, |i| i.quantity);
                let deficit = total.quantity - on_hand;
                (deficit > DEFICIT_EPSILON).then(|| IngredientRequirement {
                    ingredient_id: total.ingredient_id,
                    name: total.name.clone(),
                    quantity: deficit,
                    unit: total.unit,
                })
            })
            .collect();
        deficits.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(deficits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;
    use std::collections::BTreeSet;

    fn recipe(id: i64, name: &str, ingredients: Vec<(i64, &str, f64)>) -> RecipeDetail {
        RecipeDetail {
            summary: RecipeSummary {
                id,
                name: name.into(),
                description: String::new(),
                prep_time_minutes: 15,
                allergens: BTreeSet::new(),
                owner_id: 1,
                is_favorite: false,
                favorite_count: 0,
            },
            guide_steps: vec!["Prep".into(), "Cook".into(), "Serve".into()],
            ingredients: ingredients
                .into_iter()
                .map(|(ingredient_id, name, quantity)| IngredientRequirement {
                    ingredient_id,
                    name: name.into(),
                    quantity,
                    unit: Unit::Grams,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_paging_slices_in_order() {
        let fixture = FixtureCatalog::with_recipes(
            (1..=5).map(|id| recipe(id, &format!("r{id}"), vec![])).collect(),
        );
        let page = fixture
            .fetch_recipes(PageRequest { page: 2, per_page: 2 })
            .await
            .unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[tokio::test]
    async fn test_injected_failure_and_call_count() {
        let fixture = FixtureCatalog::new();
        fixture.fail_on("fetch_inventory");
        assert!(fixture.fetch_inventory().await.is_err());
        fixture.clear_failures();
        assert!(fixture.fetch_inventory().await.is_ok());
        assert_eq!(fixture.call_count("fetch_inventory"), 2);
    }

    #[tokio::test]
    async fn test_resolve_nets_inventory_and_sorts_by_name() {
        let fixture = FixtureCatalog::new();
        fixture.set_inventory(vec![InventoryItem {
            ingredient_id: 1,
            name: "Flour".into(),
            quantity: 300.0,
            unit: Unit::Grams,
        }]);
        let totals = vec![
            IngredientRequirement {
                ingredient_id: 2,
                name: "Sugar".into(),
                quantity: 100.0,
                unit: Unit::Grams,
            },
            IngredientRequirement {
                ingredient_id: 1,
                name: "Flour".into(),
                quantity: 500.0,
                unit: Unit::Grams,
            },
            IngredientRequirement {
                ingredient_id: 3,
                name: "Butter".into(),
                quantity: 200.0,
                unit: Unit::Grams,
            },
        ];
        let deficits = fixture.resolve_shopping_list(&totals).await.unwrap();
        let names: Vec<_> = deficits.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Butter", "Flour", "Sugar"]);
        assert_eq!(deficits[1].quantity, 200.0);
    }

    #[tokio::test]
    async fn test_fully_covered_ingredient_is_omitted() {
        let fixture = FixtureCatalog::new();
        fixture.set_inventory(vec![InventoryItem {
            ingredient_id: 1,
            name: "Flour".into(),
            quantity: 500.0,
            unit: Unit::Grams,
        }]);
        let totals = vec![IngredientRequirement {
            ingredient_id: 1,
            name: "Flour".into(),
            quantity: 500.0,
            unit: Unit::Grams,
        }];
        let deficits = fixture.resolve_shopping_list(&totals).await.unwrap();
        assert!(deficits.is_empty());
    }

    #[tokio::test]
    async fn test_favorite_toggle_is_idempotent() {
        let fixture = FixtureCatalog::with_recipes(vec![recipe(1, "Stew", vec![])]);
        fixture.add_favorite(1).await.unwrap();
        fixture.add_favorite(1).await.unwrap();
        let favorites = fixture.fetch_favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].favorite_count, 1);
    }

    #[tokio::test]
    async fn test_totals_accumulate_across_recipes() {
        let fixture = FixtureCatalog::with_recipes(vec![
            recipe(1, "Bread", vec![(10, "Flour", 500.0)]),
            recipe(2, "Cake", vec![(10, "Flour", 200.0), (11, "Sugar", 150.0)]),
        ]);
        let totals = fixture
            .compute_ingredient_totals(&[
                RecipeQuantity { recipe_id: 1, count: 2 },
                RecipeQuantity { recipe_id: 2, count: 1 },
            ])
            .await
            .unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].ingredient_id, 10);
        assert_eq!(totals[0].quantity, 1200.0);
        assert_eq!(totals[1].quantity, 150.0);
    }
}
