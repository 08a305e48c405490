// ABOUTME: Pure reduction of meal plan days into per-recipe occurrence counts
// ABOUTME: Deduplicates by recipe id with deterministic first-occurrence ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Meal Plan Aggregator
//!
//! A pure reduction with no I/O: the input days have already been filtered
//! to a date range by the persistence layer. Output order is the insertion
//! order of each recipe's first occurrence, which keeps repeated runs over
//! the same input byte-identical.

use std::collections::HashMap;

use crate::models::{MealPlanDay, RecipeQuantity};

/// Reduce plan days to occurrence counts per recipe.
///
/// Each count equals the number of meal slots referencing that recipe
/// across all days and meal types in the input. Empty input yields an empty
/// result, which callers treat as "nothing to buy" rather than an error.
#[must_use]
pub fn aggregate_meal_plan(days: &[MealPlanDay]) -> Vec<RecipeQuantity> {
    let mut quantities: Vec<RecipeQuantity> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for day in days {
        for slot in &day.slots {
            match index.get(&slot.recipe_id) {
                Some(&i) => quantities[i].count += 1,
                None => {
                    index.insert(slot.recipe_id, quantities.len());
                    quantities.push(RecipeQuantity { recipe_id: slot.recipe_id, count: 1 });
                }
            }
        }
    }

    quantities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealSlot, MealType};
    use chrono::NaiveDate;

    fn day(ymd: (i32, u32, u32), slots: &[(MealType, i64)]) -> MealPlanDay {
        let mut entry = MealPlanDay::new(NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap());
        for (meal_type, recipe_id) in slots {
            entry.set_slot(MealSlot {
                meal_type: *meal_type,
                recipe_id: *recipe_id,
                recipe_name: format!("recipe {recipe_id}"),
            });
        }
        entry
    }

    #[test]
    fn test_counts_across_days_and_meal_types() {
        let days = vec![
            day((2025, 6, 1), &[(MealType::Breakfast, 1), (MealType::Lunch, 2)]),
            day((2025, 6, 2), &[(MealType::Dinner, 1)]),
            day((2025, 6, 3), &[]),
        ];
        let quantities = aggregate_meal_plan(&days);
        assert_eq!(
            quantities,
            vec![
                RecipeQuantity { recipe_id: 1, count: 2 },
                RecipeQuantity { recipe_id: 2, count: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        assert!(aggregate_meal_plan(&[]).is_empty());
        assert!(aggregate_meal_plan(&[day((2025, 6, 1), &[])]).is_empty());
    }

    #[test]
    fn test_deterministic_across_runs() {
        let days = vec![
            day((2025, 6, 1), &[(MealType::Breakfast, 7), (MealType::Snack, 3)]),
            day((2025, 6, 2), &[(MealType::Lunch, 3), (MealType::Dinner, 7)]),
        ];
        let first = aggregate_meal_plan(&days);
        let second = aggregate_meal_plan(&days);
        assert_eq!(first, second);
        // first-occurrence order: recipe 7 was seen before recipe 3
        assert_eq!(first[0].recipe_id, 7);
        assert_eq!(first[0].count, 2);
    }
}
