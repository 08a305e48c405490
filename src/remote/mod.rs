// ABOUTME: Remote catalog collaborator module with trait and implementations
// ABOUTME: Exposes the RemoteCatalog trait, the HTTP client, and the in-memory fixture
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Remote catalog access.
//!
//! Everything the engine needs from the network is expressed as the
//! [`RemoteCatalog`](core::RemoteCatalog) trait. Two implementations ship:
//!
//! - [`HttpCatalog`](http::HttpCatalog) talks to the real catalog service
//! - [`FixtureCatalog`](fixture::FixtureCatalog) is an in-memory double for
//!   tests, development, and demonstrations

/// Core trait shared by all remote catalog implementations
pub mod core;

/// In-memory fixture implementation
pub mod fixture;

/// HTTP implementation backed by reqwest
pub mod http;

pub use core::RemoteCatalog;
pub use fixture::FixtureCatalog;
pub use http::HttpCatalog;
