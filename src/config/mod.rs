// ABOUTME: Configuration module for the larder engine
// ABOUTME: Re-exports environment-based client configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

/// Environment-based configuration management
pub mod environment;

pub use environment::{ClientConfig, LogLevel};
