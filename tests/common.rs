// ABOUTME: Shared builders for integration tests
// ABOUTME: Constructs recipe details, inventory items, and fixture catalogs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

#![allow(dead_code)]

use std::collections::BTreeSet;

use larder::models::{
    IngredientRequirement, InventoryItem, RecipeDetail, RecipeSummary, Unit,
};

/// Build a recipe detail with the given ingredient lines
pub fn recipe_detail(id: i64, name: &str, ingredients: &[(i64, &str, f64, Unit)]) -> RecipeDetail {
    RecipeDetail {
        summary: recipe_summary(id, name),
        guide_steps: vec![
            "Prep the ingredients".into(),
            "Cook everything".into(),
            "Plate and serve".into(),
        ],
        ingredients: ingredients
            .iter()
            .map(|&(ingredient_id, ingredient_name, quantity, unit)| IngredientRequirement {
                ingredient_id,
                name: ingredient_name.into(),
                quantity,
                unit,
            })
            .collect(),
    }
}

/// Build a bare recipe summary owned by user 1
pub fn recipe_summary(id: i64, name: &str) -> RecipeSummary {
    RecipeSummary {
        id,
        name: name.into(),
        description: String::new(),
        prep_time_minutes: 20,
        allergens: BTreeSet::new(),
        owner_id: 1,
        is_favorite: false,
        favorite_count: 0,
    }
}

/// Build a pantry line
pub fn inventory_item(ingredient_id: i64, name: &str, quantity: f64, unit: Unit) -> InventoryItem {
    InventoryItem {
        ingredient_id,
        name: name.into(),
        quantity,
        unit,
    }
}
