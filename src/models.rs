// ABOUTME: Core data models for the larder meal planning engine
// ABOUTME: Defines recipes, ingredients, inventory, meal plan days, and shopping lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Data Models
//!
//! This module contains the core data structures used throughout the larder
//! engine. The models are value types: stores hand out immutable snapshots
//! and accept mutation intents, they never share mutable references with
//! callers.
//!
//! ## Core Models
//!
//! - `RecipeSummary` / `RecipeDetail`: catalog entries and their on-demand
//!   detail snapshots
//! - `IngredientRequirement`: a quantity of one ingredient, used both as a
//!   recipe's need and as an inventory/shopping line
//! - `MealPlanDay` / `MealSlot`: one calendar day of scheduled meals
//! - `RecipeQuantity`: transient occurrence-count aggregation result
//! - `ShoppingList` / `ShoppingListItem`: persisted list with an
//!   obtain/complete lifecycle

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Minimum preparation time accepted for a recipe, in minutes
pub const MIN_PREP_TIME_MINUTES: u32 = 3;

/// Minimum number of guide steps a recipe must carry
pub const MIN_GUIDE_STEPS: usize = 3;

/// Measurement unit for an ingredient quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Discrete pieces (eggs, apples)
    Count,
    /// Weight in grams
    Grams,
    /// Volume in liters
    Liters,
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Count => write!(f, "count"),
            Self::Grams => write!(f, "grams"),
            Self::Liters => write!(f, "liters"),
        }
    }
}

impl FromStr for Unit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(Self::Count),
            "grams" => Ok(Self::Grams),
            "liters" => Ok(Self::Liters),
            other => Err(AppError::invalid_input(format!("unknown unit: {other}"))),
        }
    }
}

/// Catalog entry as returned by the paginated recipe listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Unique recipe identifier
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Short description
    pub description: String,
    /// Preparation time in minutes, at least [`MIN_PREP_TIME_MINUTES`]
    pub prep_time_minutes: u32,
    /// Allergens present in the recipe
    pub allergens: BTreeSet<String>,
    /// Identifier of the owning user
    pub owner_id: i64,
    /// Whether the current user has favorited this recipe.
    /// Mutated only through the favorite reconciler.
    pub is_favorite: bool,
    /// Number of users who favorited this recipe, never negative.
    /// Mutated only through the favorite reconciler, together with
    /// `is_favorite`.
    pub favorite_count: u32,
}

/// Full recipe snapshot fetched on demand, not cached beyond its view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Summary fields
    #[serde(flatten)]
    pub summary: RecipeSummary,
    /// Ordered preparation steps, at least [`MIN_GUIDE_STEPS`], each non-empty
    pub guide_steps: Vec<String>,
    /// Per-serving ingredient requirements, quantities strictly positive
    pub ingredients: Vec<IngredientRequirement>,
}

/// A quantity of one ingredient
///
/// Used both as a recipe's per-unit need and as an inventory or shopping
/// list line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRequirement {
    /// Unique ingredient identifier
    pub ingredient_id: i64,
    /// Human-readable ingredient name
    pub name: String,
    /// Quantity in the given unit, never negative
    pub quantity: f64,
    /// Measurement unit
    pub unit: Unit,
}

/// One pantry line, keyed uniquely by ingredient id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique ingredient identifier
    pub ingredient_id: i64,
    /// Human-readable ingredient name
    pub name: String,
    /// Quantity on hand, never negative
    pub quantity: f64,
    /// Measurement unit
    pub unit: Unit,
}

/// Meal type of a plan slot; a day holds at most one slot per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl Display for MealType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Breakfast => write!(f, "breakfast"),
            Self::Lunch => write!(f, "lunch"),
            Self::Dinner => write!(f, "dinner"),
            Self::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for MealType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            other => Err(AppError::invalid_input(format!("unknown meal type: {other}"))),
        }
    }
}

/// One scheduled meal within a [`MealPlanDay`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlot {
    /// Meal type, unique within the day
    pub meal_type: MealType,
    /// Scheduled recipe
    pub recipe_id: i64,
    /// Cached recipe name for display without a catalog round trip
    pub recipe_name: String,
}

/// One calendar day of scheduled meals
///
/// Days are normalized to local midnight before persistence, so `day` is a
/// plain calendar date. The slot set keeps at most one entry per meal type,
/// ordered breakfast → snack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanDay {
    /// The calendar day, unique across the plan
    pub day: NaiveDate,
    /// Scheduled slots, at most one per meal type
    pub slots: Vec<MealSlot>,
}

impl MealPlanDay {
    /// Create an empty day
    #[must_use]
    pub const fn new(day: NaiveDate) -> Self {
        Self { day, slots: Vec::new() }
    }

    /// Insert or replace the slot for the given meal type, keeping the slot
    /// ordering by meal type
    pub fn set_slot(&mut self, slot: MealSlot) {
        self.slots.retain(|s| s.meal_type != slot.meal_type);
        self.slots.push(slot);
        self.slots.sort_by_key(|s| s.meal_type);
    }

    /// Remove the slot for the given meal type, returning whether one existed
    pub fn remove_slot(&mut self, meal_type: MealType) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.meal_type != meal_type);
        self.slots.len() != before
    }

    /// Whether the day carries no scheduled meals
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Transient aggregation result: how often a recipe occurs across a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeQuantity {
    /// Recipe identifier
    pub recipe_id: i64,
    /// Occurrence count across all days and meal types, at least 1
    pub count: u32,
}

/// One line of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Unique ingredient identifier within the list
    pub ingredient_id: i64,
    /// Human-readable ingredient name
    pub name: String,
    /// Required quantity, never negative
    pub quantity: f64,
    /// Measurement unit
    pub unit: Unit,
    /// Whether the user marked the line as obtained.
    /// Freely reversible until the list completes.
    pub obtained: bool,
}

/// A persisted shopping list with an obtain/complete lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    /// Unique list identifier
    pub id: Uuid,
    /// First day of the aggregation window
    pub start_date: NaiveDate,
    /// Last day of the aggregation window, never before `start_date`
    pub end_date: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Line items, keyed by ingredient id with no duplicates
    pub items: Vec<ShoppingListItem>,
    /// One-way completion flag; a completed list is frozen
    pub completed: bool,
}

impl ShoppingList {
    /// Build a fresh draft list over the given window
    #[must_use]
    pub fn draft(range: DateRange, requirements: Vec<IngredientRequirement>) -> Self {
        let items = requirements
            .into_iter()
            .map(|req| ShoppingListItem {
                ingredient_id: req.ingredient_id,
                name: req.name,
                quantity: req.quantity,
                unit: req.unit,
                obtained: false,
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            start_date: range.start,
            end_date: range.end,
            created_at: Utc::now(),
            items,
            completed: false,
        }
    }
}

/// Validated date range used for aggregation and list creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::invalid_date_range(format!(
                "end date {end} precedes start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Synchronous check callers use to disable range-dependent actions
    /// before attempting them
    #[must_use]
    pub fn has_date_error(start: NaiveDate, end: NaiveDate) -> bool {
        end < start
    }
}

/// User-editable recipe draft submitted to create/update operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub prep_time_minutes: u32,
    pub allergens: BTreeSet<String>,
    pub guide_steps: Vec<String>,
    pub ingredients: Vec<IngredientRequirement>,
}

impl RecipeDraft {
    /// Validate the submission bounds on a draft.
    ///
    /// Surfaced synchronously so callers can disable the submit action
    /// instead of catching an error after the fact.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::invalid_recipe_draft("recipe name is empty"));
        }
        if self.prep_time_minutes < MIN_PREP_TIME_MINUTES {
            return Err(AppError::invalid_recipe_draft(format!(
                "prep time {} is below the {MIN_PREP_TIME_MINUTES} minute minimum",
                self.prep_time_minutes
            )));
        }
        if self.guide_steps.len() < MIN_GUIDE_STEPS {
            return Err(AppError::invalid_recipe_draft(format!(
                "{} guide steps provided, at least {MIN_GUIDE_STEPS} required",
                self.guide_steps.len()
            )));
        }
        if self.guide_steps.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::invalid_recipe_draft("guide steps must be non-empty"));
        }
        if let Some(bad) = self.ingredients.iter().find(|i| i.quantity <= 0.0) {
            return Err(AppError::invalid_recipe_draft(format!(
                "ingredient {} has non-positive quantity {}",
                bad.name, bad.quantity
            )));
        }
        Ok(())
    }
}

/// Catalog filter for the independently paginated filtered branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
    /// Minimum preparation time in minutes, inclusive
    pub min_time: Option<u32>,
    /// Maximum preparation time in minutes, inclusive
    pub max_time: Option<u32>,
    /// Allergens the result set must not contain
    pub exclude_allergens: BTreeSet<String>,
}

impl RecipeFilter {
    /// Whether a summary passes the filter
    #[must_use]
    pub fn matches(&self, recipe: &RecipeSummary) -> bool {
        if let Some(needle) = &self.name {
            if !recipe.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_time {
            if recipe.prep_time_minutes < min {
                return false;
            }
        }
        if let Some(max) = self.max_time {
            if recipe.prep_time_minutes > max {
                return false;
            }
        }
        self.exclude_allergens.is_disjoint(&recipe.allergens)
    }
}
