// ABOUTME: Meal planner scheduling recipes into per-day slots with retention
// ABOUTME: Normalizes days to local midnight and purges entries past the retention window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Meal Planner
//!
//! Schedules recipes into calendar-day slots backed by the local database.
//! Days exist only while they carry slots: the first assignment creates the
//! day row, removing the last slot deletes it. Entries older than
//! [`PLAN_RETENTION_DAYS`] are purged opportunistically (on session
//! establishment or an explicit call), never by a background job.

use chrono::{DateTime, Days, Local, NaiveDate};
use tracing::info;

use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{DateRange, MealPlanDay, MealSlot, MealType};

/// Rolling retention window for plan days, measured back from "today"
pub const PLAN_RETENTION_DAYS: u64 = 7;

/// Schedules meals against calendar days
pub struct MealPlanner {
    db: Database,
}

impl MealPlanner {
    /// Create a planner over the local database
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Normalize a local timestamp to its calendar day
    #[must_use]
    pub fn normalize_day(at: DateTime<Local>) -> NaiveDate {
        at.date_naive()
    }

    /// Schedule a recipe into a meal slot, replacing any slot of the same
    /// meal type on that day
    pub async fn assign_meal(
        &self,
        day: NaiveDate,
        meal_type: MealType,
        recipe_id: i64,
        recipe_name: &str,
    ) -> AppResult<()> {
        let slot = MealSlot {
            meal_type,
            recipe_id,
            recipe_name: recipe_name.to_owned(),
        };
        self.db.upsert_slot(day, &slot).await
    }

    /// Remove one meal slot; the day disappears with its last slot.
    /// Returns whether a slot existed.
    pub async fn remove_meal(&self, day: NaiveDate, meal_type: MealType) -> AppResult<bool> {
        self.db.remove_slot(day, meal_type).await
    }

    /// Clear a whole day explicitly
    pub async fn clear_day(&self, day: NaiveDate) -> AppResult<()> {
        self.db.clear_day(day).await
    }

    /// The scheduled days within a validated range, ordered by day
    pub async fn days_in_range(&self, range: DateRange) -> AppResult<Vec<MealPlanDay>> {
        self.db.days_in_range(range.start, range.end).await
    }

    /// Purge days older than the retention window, measured from `today`
    pub async fn purge_expired(&self, today: NaiveDate) -> AppResult<u64> {
        let cutoff = today
            .checked_sub_days(Days::new(PLAN_RETENTION_DAYS))
            .unwrap_or(today);
        let purged = self.db.purge_days_before(cutoff).await?;
        if purged > 0 {
            info!(purged, %cutoff, "meal plan retention purge");
        }
        Ok(purged)
    }
}
