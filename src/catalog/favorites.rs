// ABOUTME: Favorite reconciler applying optimistic toggles with rollback on failure
// ABOUTME: Keeps local favorite flags and counts eventually consistent with the remote store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Favorite Reconciler
//!
//! Lets the user toggle favorite status with low latency while keeping
//! counts eventually consistent. The optimistic path flips the local flag
//! and count first, then confirms with the remote store; if the remote call
//! fails the local flip is reverted before the error surfaces, so local
//! state never diverges permanently from remote truth.

use std::sync::Arc;

use tracing::{debug, warn};

use super::store::CatalogStore;
use crate::errors::AppResult;

/// Applies favorite toggles against a [`CatalogStore`]
pub struct FavoriteReconciler {
    store: Arc<CatalogStore>,
}

impl FavoriteReconciler {
    /// Create a reconciler over the given store
    #[must_use]
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    /// Toggle a recipe's favorite status optimistically.
    ///
    /// A recipe absent from the currently visible list is a no-op. The local
    /// flag and count flip together by exactly one before the remote call;
    /// on remote failure the flip is reverted and the error is returned. On
    /// success the derived lists (favorites, suggestions, user recipes) are
    /// re-fetched to reconcile drift caused by other sessions.
    pub async fn toggle_optimistic(&self, recipe_id: i64) -> AppResult<()> {
        let Some(now_favorite) = self.store.flip_visible_favorite(recipe_id) else {
            debug!(recipe_id, "favorite toggle ignored: recipe not visible");
            return Ok(());
        };

        let remote = self.store.remote();
        let result = if now_favorite {
            remote.add_favorite(recipe_id).await
        } else {
            remote.remove_favorite(recipe_id).await
        };

        if let Err(e) = result {
            warn!(recipe_id, error = %e, "favorite toggle failed, reverting optimistic edit");
            self.store.flip_visible_favorite(recipe_id);
            return Err(e);
        }

        self.store.refresh_derived_lists().await
    }

    /// Toggle a recipe's favorite status and reload the primary browse list.
    ///
    /// Used when an immediately consistent view matters more than latency:
    /// no local flip is applied, the authoritative state arrives with the
    /// reload.
    pub async fn toggle_strict(&self, recipe_id: i64) -> AppResult<()> {
        let Some(current) = self.store.find_visible(recipe_id) else {
            debug!(recipe_id, "strict favorite toggle ignored: recipe not visible");
            return Ok(());
        };

        let remote = self.store.remote();
        if current.is_favorite {
            remote.remove_favorite(recipe_id).await?;
        } else {
            remote.add_favorite(recipe_id).await?;
        }

        self.store.reload_browse().await;
        Ok(())
    }
}
