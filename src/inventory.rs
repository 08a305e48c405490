// ABOUTME: Full-reload mirror of the remote pantry inventory
// ABOUTME: Exposes lookup by ingredient id; mutated only by complete reloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Inventory Mirror
//!
//! Holds the user's current pantry quantities fetched from the backing
//! store. The mirror is never patched incrementally: every mutation path
//! (shopping list completion, explicit inventory edits) reloads it in full,
//! because partial local patches are unsafe against concurrent multi-device
//! edits.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::errors::AppResult;
use crate::models::InventoryItem;
use crate::remote::RemoteCatalog;

/// Read mirror of the remote pantry inventory
pub struct InventoryMirror {
    remote: Arc<dyn RemoteCatalog>,
    items: RwLock<Vec<InventoryItem>>,
}

impl InventoryMirror {
    /// Create an empty mirror; call [`reload`](Self::reload) to populate it
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteCatalog>) -> Self {
        Self {
            remote,
            items: RwLock::new(Vec::new()),
        }
    }

    /// Replace the mirror contents with a full fetch from the backing store
    pub async fn reload(&self) -> AppResult<()> {
        let fetched = self.remote.fetch_inventory().await?;
        debug!(count = fetched.len(), "inventory mirror reloaded");
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = fetched;
        Ok(())
    }

    /// Snapshot of every pantry line
    #[must_use]
    pub fn items(&self) -> Vec<InventoryItem> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up one pantry line by ingredient id
    #[must_use]
    pub fn lookup(&self, ingredient_id: i64) -> Option<InventoryItem> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|i| i.ingredient_id == ingredient_id)
            .cloned()
    }

    /// Quantity on hand for an ingredient, zero when absent
    #[must_use]
    pub fn quantity_of(&self, ingredient_id: i64) -> f64 {
        self.lookup(ingredient_id).map_or(0.0, |i| i.quantity)
    }
}
