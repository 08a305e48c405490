// ABOUTME: Main library entry point for the larder meal planning client engine
// ABOUTME: Exposes catalog sync, meal plan aggregation, and shopping list lifecycle modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

#![deny(unsafe_code)]

//! # Larder
//!
//! A household meal-planning client engine. Larder keeps a paginated,
//! filterable mirror of a remote recipe catalog consistent under optimistic
//! local edits, schedules recipes against calendar days, and derives
//! shopping lists from the gap between planned meals and pantry inventory.
//!
//! ## Architecture
//!
//! The engine follows a modular architecture:
//! - **Remote**: Abstract remote-catalog collaborator with an HTTP client
//!   and an in-memory fixture implementation
//! - **Catalog**: Paginated recipe catalog store and favorite reconciler
//! - **Plan**: Meal plan persistence, occurrence aggregation, and
//!   ingredient requirement resolution
//! - **Shopping**: Shopping list generation and obtain/complete lifecycle
//! - **Inventory**: Full-reload mirror of remote pantry state
//!
//! ## Example
//!
//! ```rust,no_run
//! use larder::config::environment::ClientConfig;
//! use larder::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ClientConfig::from_env()?;
//!     println!("catalog endpoint: {}", config.api_base_url);
//!     Ok(())
//! }
//! ```

/// Recipe catalog store, pagination branches, and favorite reconciliation
pub mod catalog;

/// Environment-based configuration management
pub mod config;

/// SQLite persistence for meal plan days and shopping lists
pub mod database;

/// Unified error handling system
pub mod errors;

/// Full-reload mirror of the remote pantry inventory
pub mod inventory;

/// Logging configuration and structured logging setup
pub mod logging;

/// Core data models shared across the engine
pub mod models;

/// Page-numbered pagination types
pub mod pagination;

/// Meal plan persistence, aggregation, and requirement resolution
pub mod plan;

/// Remote catalog collaborator trait and implementations
pub mod remote;

/// Session context and store initialization hooks
pub mod session;

/// Shopping list generation and lifecycle management
pub mod shopping;
