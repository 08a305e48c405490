// ABOUTME: Recipe catalog module with paginated branches and favorite reconciliation
// ABOUTME: Exposes the CatalogStore, per-branch pagination state, and the FavoriteReconciler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Recipe catalog synchronization.
//!
//! The catalog store presents a single forward-growing sequence of recipe
//! summaries sourced from the remote paginated endpoint, plus an
//! independently paginated filtered branch and auxiliary derived lists
//! (favorites, suggestions, user-owned recipes).

/// Per-branch pagination state machine
pub mod branch;

/// Optimistic and strict favorite toggles
pub mod favorites;

/// The catalog store itself
pub mod store;

pub use branch::{BranchPhase, BranchSnapshot};
pub use favorites::FavoriteReconciler;
pub use store::CatalogStore;
