// ABOUTME: Ingredient requirement resolver expanding occurrence counts into net shopping needs
// ABOUTME: Aggregates gross totals locally and delegates inventory netting to the remote service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Ingredient Requirement Resolver
//!
//! Expands [`RecipeQuantity`] occurrence counts into a net shopping
//! requirement. The gross totals are aggregated locally — each recipe's
//! per-unit requirements are multiplied by its occurrence count exactly
//! once, however many days and slots reference it — and the inventory
//! subtraction is delegated to the remote service, which returns only
//! positive deficits sorted by name.
//!
//! Resolving the same input twice (absent inventory or recipe changes)
//! yields an identical requirement list.

use std::sync::Arc;

use tracing::debug;

use crate::errors::AppResult;
use crate::models::{IngredientRequirement, RecipeQuantity};
use crate::remote::RemoteCatalog;

/// Expands occurrence counts into net ingredient requirements
pub struct RequirementResolver {
    remote: Arc<dyn RemoteCatalog>,
}

impl RequirementResolver {
    /// Create a resolver over the given remote collaborator
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteCatalog>) -> Self {
        Self { remote }
    }

    /// Aggregate gross ingredient totals for the given occurrence counts.
    ///
    /// Fetches each recipe's detail once, multiplies every ingredient line
    /// by the occurrence count, and accumulates by ingredient id in
    /// first-occurrence order. A failed detail fetch fails the whole
    /// aggregation; partial totals are never returned.
    pub async fn aggregate_totals(
        &self,
        quantities: &[RecipeQuantity],
    ) -> AppResult<Vec<IngredientRequirement>> {
        let mut totals: Vec<IngredientRequirement> = Vec::new();

        for quantity in quantities {
            let detail = self.remote.fetch_recipe_detail(quantity.recipe_id).await?;
            for ingredient in &detail.ingredients {
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

        debug!(
            recipes = quantities.len(),
            ingredients = totals.len(),
            "aggregated gross ingredient totals"
        );
        Ok(totals)
    }

    /// Resolve occurrence counts into the net shopping requirement.
    ///
    /// Empty input resolves to an empty list without a remote round trip:
    /// nothing planned means nothing to buy.
    pub async fn resolve(
        &self,
        quantities: &[RecipeQuantity],
    ) -> AppResult<Vec<IngredientRequirement>> {
        if quantities.is_empty() {
            return Ok(Vec::new());
        }
        let totals = self.aggregate_totals(quantities).await?;
        self.remote.resolve_shopping_list(&totals).await
    }
}
