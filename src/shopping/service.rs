// ABOUTME: Shopping list generation service validating ranges and persisting drafts
// ABOUTME: Wires the aggregator and resolver to the local database and inventory mirror
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Shopping Service
//!
//! Turns a date range of planned meals into a persisted draft shopping
//! list. The range is validated synchronously (`end ≥ start`) so callers
//! can disable the generate action before attempting it; a range with no
//! planned meals produces an empty draft, not an error.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use super::list::ShoppingListManager;
use crate::database::Database;
use crate::errors::AppResult;
use crate::inventory::InventoryMirror;
use crate::models::{DateRange, ShoppingList};
use crate::plan::{aggregate_meal_plan, RequirementResolver};
use crate::remote::RemoteCatalog;

/// Generates and opens shopping lists
pub struct ShoppingService {
    db: Database,
    remote: Arc<dyn RemoteCatalog>,
    inventory: Arc<InventoryMirror>,
    resolver: RequirementResolver,
}

impl ShoppingService {
    /// Create a service over the local database and remote collaborator
    #[must_use]
    pub fn new(
        db: Database,
        remote: Arc<dyn RemoteCatalog>,
        inventory: Arc<InventoryMirror>,
    ) -> Self {
        let resolver = RequirementResolver::new(Arc::clone(&remote));
        Self { db, remote, inventory, resolver }
    }

    /// Synchronous range check for disabling the generate action in the UI
    #[must_use]
    pub fn has_date_error(start: NaiveDate, end: NaiveDate) -> bool {
        DateRange::has_date_error(start, end)
    }

    /// Generate a draft shopping list from the meals planned in
    /// `[start, end]` and persist it.
    ///
    /// Fails synchronously with a validation error when `end < start`.
    pub async fn generate(&self, start: NaiveDate, end: NaiveDate) -> AppResult<ShoppingList> {
        let range = DateRange::new(start, end)?;

        let days = self.db.days_in_range(range.start, range.end).await?;
        let quantities = aggregate_meal_plan(&days);
        let requirements = self.resolver.resolve(&quantities).await?;

        let list = ShoppingList::draft(range, requirements);
        self.db.save_shopping_list(&list).await?;
        info!(
            list_id = %list.id,
            items = list.items.len(),
            %start,
            %end,
            "generated shopping list draft"
        );
        Ok(list)
    }

    /// Generate, persist, and immediately open a manager for the new list
    pub async fn generate_managed(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<ShoppingListManager> {
        let list = self.generate(start, end).await?;
        Ok(ShoppingListManager::new(
            list,
            self.db.clone(),
            Arc::clone(&self.remote),
            Arc::clone(&self.inventory),
        ))
    }

    /// Open a manager for a stored list
    pub async fn open(&self, id: Uuid) -> AppResult<Option<ShoppingListManager>> {
        ShoppingListManager::load(
            id,
            self.db.clone(),
            Arc::clone(&self.remote),
            Arc::clone(&self.inventory),
        )
        .await
    }

    /// Every stored list, newest first
    pub async fn stored_lists(&self) -> AppResult<Vec<ShoppingList>> {
        self.db.list_shopping_lists().await
    }
}
