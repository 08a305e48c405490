// ABOUTME: SQLite persistence for meal plan days and shopping lists
// ABOUTME: Owns the connection pool, inline migrations, and plan/list queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Database Management
//!
//! Local persistence for the meal plan and shopping lists. The schema
//! enforces the data-model invariants directly:
//!
//! - one row per calendar day (`meal_plan_days.day UNIQUE`)
//! - at most one slot per meal type per day (`UNIQUE(day_id, meal_type)`)
//! - slots are deleted with their day (`ON DELETE CASCADE`)
//! - one line per ingredient per shopping list
//!   (`UNIQUE(list_id, ingredient_id)`)
//!
//! Migrations run inline at construction; there is no separate migration
//! binary for a single-user client store.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{
    MealPlanDay, MealSlot, MealType, ShoppingList, ShoppingListItem, Unit,
};

/// Database manager for meal plan and shopping list storage
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `database_url` and run
    /// migrations
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("invalid database URL: {e}")))?
            .create_if_missing(true)
            // cascade deletion of slots and list items relies on this
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database_url, "database ready");
        Ok(db)
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS meal_plan_days (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day TEXT NOT NULL UNIQUE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS meal_slots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day_id INTEGER NOT NULL REFERENCES meal_plan_days(id) ON DELETE CASCADE,
                meal_type TEXT NOT NULL,
                recipe_id INTEGER NOT NULL,
                recipe_name TEXT NOT NULL,
                UNIQUE(day_id, meal_type)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS shopping_lists (
                id TEXT PRIMARY KEY,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS shopping_list_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                list_id TEXT NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                quantity REAL NOT NULL,
                unit TEXT NOT NULL,
                obtained INTEGER NOT NULL DEFAULT 0,
                UNIQUE(list_id, ingredient_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ── Meal plan ───────────────────────────────────────────────────────

    /// Insert or replace the slot for `meal_type` on `day`, creating the day
    /// row on first assignment
    pub async fn upsert_slot(&self, day: NaiveDate, slot: &MealSlot) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO meal_plan_days (day) VALUES (?)")
            .bind(day.to_string())
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            INSERT INTO meal_slots (day_id, meal_type, recipe_id, recipe_name)
            SELECT id, ?, ?, ? FROM meal_plan_days WHERE day = ?
            ON CONFLICT(day_id, meal_type)
            DO UPDATE SET recipe_id = excluded.recipe_id, recipe_name = excluded.recipe_name
            ",
        )
        .bind(slot.meal_type.to_string())
        .bind(slot.recipe_id)
        .bind(&slot.recipe_name)
        .bind(day.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove the slot for `meal_type` on `day`; the day row is deleted with
    /// its last slot. Returns whether a slot was removed.
    pub async fn remove_slot(&self, day: NaiveDate, meal_type: MealType) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM meal_slots
            WHERE meal_type = ?
              AND day_id = (SELECT id FROM meal_plan_days WHERE day = ?)
            ",
        )
        .bind(meal_type.to_string())
        .bind(day.to_string())
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            DELETE FROM meal_plan_days
            WHERE day = ?
              AND NOT EXISTS (SELECT 1 FROM meal_slots WHERE day_id = meal_plan_days.id)
            ",
        )
        .bind(day.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a day and, by cascade, all its slots
    pub async fn clear_day(&self, day: NaiveDate) -> AppResult<()> {
        sqlx::query("DELETE FROM meal_plan_days WHERE day = ?")
            .bind(day.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Fetch the plan days within `[start, end]`, ordered by day, slots
    /// ordered breakfast → snack
    pub async fn days_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<MealPlanDay>> {
        let rows = sqlx::query(
            r"
            SELECT d.day, s.meal_type, s.recipe_id, s.recipe_name
            FROM meal_plan_days d
            JOIN meal_slots s ON s.day_id = d.id
            WHERE d.day >= ? AND d.day <= ?
            ORDER BY d.day
            ",
        )
        .bind(start.to_string())
        .bind(end.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut days: Vec<MealPlanDay> = Vec::new();
        for row in rows {
            let day: NaiveDate = parse_date(&row.get::<String, _>("day"))?;
            let slot = MealSlot {
                meal_type: MealType::from_str(&row.get::<String, _>("meal_type"))?,
                recipe_id: row.get("recipe_id"),
                recipe_name: row.get("recipe_name"),
            };
            match days.last_mut() {
                Some(last) if last.day == day => last.set_slot(slot),
                _ => {
                    let mut entry = MealPlanDay::new(day);
                    entry.set_slot(slot);
                    days.push(entry);
                }
            }
        }
        Ok(days)
    }

    /// Delete every plan day strictly before `cutoff`, returning how many
    /// days were purged
    pub async fn purge_days_before(&self, cutoff: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM meal_plan_days WHERE day < ?")
            .bind(cutoff.to_string())
            .execute(&self.pool)
            .await?;
        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged, %cutoff, "purged expired meal plan days");
        }
        Ok(purged)
    }

    // ── Shopping lists ──────────────────────────────────────────────────

    /// Persist a freshly generated draft list with its items
    pub async fn save_shopping_list(&self, list: &ShoppingList) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO shopping_lists (id, start_date, end_date, created_at, completed)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(list.id.to_string())
        .bind(list.start_date.to_string())
        .bind(list.end_date.to_string())
        .bind(list.created_at.to_rfc3339())
        .bind(i32::from(list.completed))
        .execute(&mut *tx)
        .await?;

        for item in &list.items {
            sqlx::query(
                r"
                INSERT INTO shopping_list_items
                    (list_id, ingredient_id, name, quantity, unit, obtained)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(list.id.to_string())
            .bind(item.ingredient_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit.to_string())
            .bind(i32::from(item.obtained))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Load one shopping list with its items
    pub async fn load_shopping_list(&self, id: Uuid) -> AppResult<Option<ShoppingList>> {
        let Some(row) = sqlx::query(
            "SELECT id, start_date, end_date, created_at, completed FROM shopping_lists WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = self.load_items(id).await?;
        Ok(Some(Self::row_to_list(&row, items)?))
    }

    /// Load every stored shopping list, newest first
    pub async fn list_shopping_lists(&self) -> AppResult<Vec<ShoppingList>> {
        let rows = sqlx::query(
            "SELECT id, start_date, end_date, created_at, completed FROM shopping_lists ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            let id = parse_uuid(&row.get::<String, _>("id"))?;
            let items = self.load_items(id).await?;
            lists.push(Self::row_to_list(&row, items)?);
        }
        Ok(lists)
    }

    /// Persist one item's obtained flag
    pub async fn set_item_obtained(
        &self,
        list_id: Uuid,
        ingredient_id: i64,
        obtained: bool,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE shopping_list_items SET obtained = ? WHERE list_id = ? AND ingredient_id = ?",
        )
        .bind(i32::from(obtained))
        .bind(list_id.to_string())
        .bind(ingredient_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persist the same obtained flag on every item of a list
    pub async fn set_all_items_obtained(&self, list_id: Uuid, obtained: bool) -> AppResult<()> {
        sqlx::query("UPDATE shopping_list_items SET obtained = ? WHERE list_id = ?")
            .bind(i32::from(obtained))
            .bind(list_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove one item from a draft list
    pub async fn delete_item(&self, list_id: Uuid, ingredient_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM shopping_list_items WHERE list_id = ? AND ingredient_id = ?")
            .bind(list_id.to_string())
            .bind(ingredient_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Atomically mark every item obtained and flip the completion flag.
    /// No partially-obtained completed list is ever observable.
    pub async fn complete_shopping_list(&self, list_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE shopping_list_items SET obtained = 1 WHERE list_id = ?")
            .bind(list_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE shopping_lists SET completed = 1 WHERE id = ?")
            .bind(list_id.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn load_items(&self, list_id: Uuid) -> AppResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query(
            r"
            SELECT ingredient_id, name, quantity, unit, obtained
            FROM shopping_list_items
            WHERE list_id = ?
            ORDER BY id
            ",
        )
        .bind(list_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ShoppingListItem {
                    ingredient_id: row.get("ingredient_id"),
                    name: row.get("name"),
                    quantity: row.get("quantity"),
                    unit: Unit::from_str(&row.get::<String, _>("unit"))?,
                    obtained: row.get::<i32, _>("obtained") != 0,
                })
            })
            .collect()
    }

    fn row_to_list(
        row: &sqlx::sqlite::SqliteRow,
        items: Vec<ShoppingListItem>,
    ) -> AppResult<ShoppingList> {
        Ok(ShoppingList {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            start_date: parse_date(&row.get::<String, _>("start_date"))?,
            end_date: parse_date(&row.get::<String, _>("end_date"))?,
            created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
            items,
            completed: row.get::<i32, _>("completed") != 0,
        })
    }
}

fn parse_date(s: &str) -> AppResult<NaiveDate> {
    s.parse()
        .map_err(|e| AppError::database(format!("malformed date {s}: {e}")))
}

fn parse_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("malformed timestamp {s}: {e}")))
}

fn parse_uuid(s: &str) -> AppResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| AppError::database(format!("malformed list id {s}: {e}")))
}
