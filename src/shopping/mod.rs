// ABOUTME: Shopping list module covering generation and the obtain/complete lifecycle
// ABOUTME: Exposes the ShoppingService and the per-list ShoppingListManager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Shopping list generation and lifecycle.
//!
//! The service derives a draft list from the planned meals of a date range;
//! the manager owns one list's mutable obtain/missing state and its one-way
//! transition to completed, which folds the bought quantities back into the
//! pantry inventory.

/// Per-list lifecycle management
pub mod list;

/// Date-validated list generation
pub mod service;

pub use list::ShoppingListManager;
pub use service::ShoppingService;
