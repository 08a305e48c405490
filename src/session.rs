// ABOUTME: Session context and explicit store initialization hooks
// ABOUTME: Replaces process-wide login broadcasts with registered on-session-established hooks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Session Lifecycle
//!
//! Stores do not listen on a process-wide broadcast channel for login
//! events. Instead, a [`Session`] holds the authenticated context and an
//! explicit list of [`SessionHook`] registrations; establishing the session
//! fires every hook once, in registration order.
//!
//! The shipped hooks reload the catalog store, reload the inventory mirror,
//! and run the meal-plan retention purge.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::catalog::CatalogStore;
use crate::errors::AppResult;
use crate::inventory::InventoryMirror;
use crate::plan::MealPlanner;

/// Authenticated session context passed to every hook
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The signed-in user, when known
    pub user_id: Option<i64>,
    /// When the session was established, in the device's time zone
    pub established_at: DateTime<Local>,
}

impl SessionContext {
    /// Context for the current instant
    #[must_use]
    pub fn now(user_id: Option<i64>) -> Self {
        Self { user_id, established_at: Local::now() }
    }
}

/// A store-level reaction to session establishment
#[async_trait]
pub trait SessionHook: Send + Sync {
    /// Hook name used in logs
    fn name(&self) -> &'static str;

    /// Called once when the session is established
    async fn on_session_established(&self, context: &SessionContext) -> AppResult<()>;
}

/// Explicit registry of session hooks
#[derive(Default)]
pub struct Session {
    hooks: Vec<Arc<dyn SessionHook>>,
}

impl Session {
    /// Create an empty session registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook; hooks fire in registration order
    pub fn register(&mut self, hook: Arc<dyn SessionHook>) {
        self.hooks.push(hook);
    }

    /// Fire every hook once. A failing hook is logged and skipped — each
    /// store surfaces its own error state, and all of them recover on the
    /// next establish or explicit reload.
    pub async fn establish(&self, context: &SessionContext) {
        info!(user_id = ?context.user_id, "session established");
        for hook in &self.hooks {
            if let Err(e) = hook.on_session_established(context).await {
                warn!(hook = hook.name(), error = %e, "session hook failed");
            }
        }
    }
}

#[async_trait]
impl SessionHook for CatalogStore {
    fn name(&self) -> &'static str {
        "catalog-store"
    }

    async fn on_session_established(&self, _context: &SessionContext) -> AppResult<()> {
        self.load_first_page().await;
        self.refresh_derived_lists().await
    }
}

#[async_trait]
impl SessionHook for InventoryMirror {
    fn name(&self) -> &'static str {
        "inventory-mirror"
    }

    async fn on_session_established(&self, _context: &SessionContext) -> AppResult<()> {
        self.reload().await
    }
}

#[async_trait]
impl SessionHook for MealPlanner {
    fn name(&self) -> &'static str {
        "meal-planner"
    }

    async fn on_session_established(&self, context: &SessionContext) -> AppResult<()> {
        self.purge_expired(context.established_at.date_naive()).await?;
        Ok(())
    }
}
