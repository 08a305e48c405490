// ABOUTME: Shopping list lifecycle manager owning one list's mutable state
// ABOUTME: Handles obtained toggles, item deletion, and the one-way completion transition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Shopping List Lifecycle Manager
//!
//! Owns one shopping list's state through `draft (editable)` →
//! `completed (frozen)`. There is no transition back: once completed, every
//! mutating call is a silent no-op (callers are expected to check
//! [`is_completed`](ShoppingListManager::is_completed) first).
//!
//! Completion is atomic. The persisted list is never observable with the
//! completion flag set but items still missing, and the manager folds every
//! item's required quantity back into the pantry exactly once, tracking the
//! fold-back across in-process retries so a failed local commit does not
//! double it.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::database::Database;
use crate::errors::AppResult;
use crate::inventory::InventoryMirror;
use crate::models::{IngredientRequirement, ShoppingList, ShoppingListItem};
use crate::remote::RemoteCatalog;

/// Owns one shopping list's mutable state and terminal transition
pub struct ShoppingListManager {
    list: ShoppingList,
    db: Database,
    remote: Arc<dyn RemoteCatalog>,
    inventory: Arc<InventoryMirror>,
    /// Whether this manager already folded the list into the pantry; a
    /// completion retried after a local commit failure must not fold twice
    delta_applied: bool,
}

impl ShoppingListManager {
    /// Wrap an already-persisted list
    #[must_use]
    pub fn new(
        list: ShoppingList,
        db: Database,
        remote: Arc<dyn RemoteCatalog>,
        inventory: Arc<InventoryMirror>,
    ) -> Self {
        Self { list, db, remote, inventory, delta_applied: false }
    }

    /// Load a stored list by id
    pub async fn load(
        id: Uuid,
        db: Database,
        remote: Arc<dyn RemoteCatalog>,
        inventory: Arc<InventoryMirror>,
    ) -> AppResult<Option<Self>> {
        Ok(db
            .load_shopping_list(id)
            .await?
            .map(|list| Self::new(list, db.clone(), remote, inventory)))
    }

    /// Immutable snapshot of the managed list
    #[must_use]
    pub const fn list(&self) -> &ShoppingList {
        &self.list
    }

    /// Whether the list has reached its terminal state
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.list.completed
    }

    /// Flip one item's obtained flag. Silent no-op once completed or when
    /// the ingredient is not on the list.
    ///
    /// The flag is persisted first; the in-memory list only changes once the
    /// write succeeded, so a failure leaves memory and database agreeing.
    pub async fn toggle_obtained(&mut self, ingredient_id: i64) -> AppResult<()> {
        if self.list.completed {
            debug!(list_id = %self.list.id, "toggle ignored: list completed");
            return Ok(());
        }
        let Some(index) = self
            .list
            .items
            .iter()
            .position(|i| i.ingredient_id == ingredient_id)
        else {
            return Ok(());
        };
        let obtained = !self.list.items[index].obtained;
        self.db
            .set_item_obtained(self.list.id, ingredient_id, obtained)
            .await?;
        self.list.items[index].obtained = obtained;
        Ok(())
    }

    /// Reset every item's obtained flag to false. Silent no-op once
    /// completed.
    pub async fn mark_all_missing(&mut self) -> AppResult<()> {
        if self.list.completed {
            return Ok(());
        }
        self.db.set_all_items_obtained(self.list.id, false).await?;
        for item in &mut self.list.items {
            item.obtained = false;
        }
        Ok(())
    }

    /// Remove an item from the draft list. Silent no-op once completed.
    pub async fn delete_item(&mut self, ingredient_id: i64) -> AppResult<()> {
        if self.list.completed {
            debug!(list_id = %self.list.id, "delete ignored: list completed");
            return Ok(());
        }
        if !self.list.items.iter().any(|i| i.ingredient_id == ingredient_id) {
            return Ok(());
        }
        self.db.delete_item(self.list.id, ingredient_id).await?;
        self.list.items.retain(|i| i.ingredient_id != ingredient_id);
        Ok(())
    }

    /// Complete the list: every item becomes obtained and the completion
    /// flag flips, atomically. Each item's required quantity is added to the
    /// pantry exactly once, and the inventory mirror is reloaded in full.
    ///
    /// A second call is a silent no-op. When the inventory fold-back fails
    /// nothing is committed, so a retry starts from the draft state. When
    /// the fold-back succeeded but the local commit failed, a retry skips
    /// the fold-back and only re-attempts the commit.
    pub async fn complete(&mut self) -> AppResult<()> {
        if self.list.completed {
            debug!(list_id = %self.list.id, "complete ignored: already completed");
            return Ok(());
        }

        // fold quantities into the pantry first; a transport failure leaves
        // the list a fully editable draft
        if !self.delta_applied {
            let deltas: Vec<IngredientRequirement> = self
                .list
                .items
                .iter()
                .map(|item| IngredientRequirement {
                    ingredient_id: item.ingredient_id,
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit: item.unit,
                })
                .collect();
            self.remote.apply_inventory_delta(&deltas).await?;
            self.delta_applied = true;
        }

        self.db.complete_shopping_list(self.list.id).await?;
        for item in &mut self.list.items {
            item.obtained = true;
        }
        self.list.completed = true;
        info!(list_id = %self.list.id, items = self.list.items.len(), "shopping list completed");

        // the mirror is never patched locally, always reloaded
        self.inventory.reload().await
    }

    /// Items not yet obtained, sorted by name
    #[must_use]
    pub fn missing_items(&self) -> Vec<ShoppingListItem> {
        let mut items: Vec<ShoppingListItem> = self
            .list
            .items
            .iter()
            .filter(|i| !i.obtained)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Items already obtained, sorted by name
    #[must_use]
    pub fn obtained_items(&self) -> Vec<ShoppingListItem> {
        let mut items: Vec<ShoppingListItem> = self
            .list
            .items
            .iter()
            .filter(|i| i.obtained)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }
}
