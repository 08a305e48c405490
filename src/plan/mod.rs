// ABOUTME: Meal plan module covering scheduling, aggregation, and requirement resolution
// ABOUTME: Exposes the MealPlanner, the occurrence aggregator, and the RequirementResolver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Meal planning and the aggregation path.
//!
//! Data flows planner → aggregator → resolver: scheduled days are reduced to
//! per-recipe occurrence counts, which expand into gross ingredient totals
//! and finally a net shopping requirement.

/// Pure reduction of plan days to occurrence counts
pub mod aggregate;

/// Slot scheduling and retention
pub mod planner;

/// Gross totals expansion and inventory netting
pub mod resolve;

pub use aggregate::aggregate_meal_plan;
pub use planner::{MealPlanner, PLAN_RETENTION_DAYS};
pub use resolve::RequirementResolver;
