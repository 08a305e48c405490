// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing for the client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Environment-based configuration management.
//!
//! The client is configured entirely through environment variables, with
//! sensible development defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `LARDER_API_BASE_URL` | `http://localhost:8080/api` | Remote catalog endpoint |
//! | `LARDER_API_TOKEN` | unset | Bearer token for the catalog service |
//! | `LARDER_DATABASE_URL` | `sqlite:larder.db` | Local plan/list storage |
//! | `LARDER_PER_PAGE` | `20` | Catalog page size |
//! | `LARDER_HTTP_TIMEOUT_SECS` | `30` | Remote request timeout |
//! | `LARDER_LOG_LEVEL` | `info` | Log verbosity |

use std::env;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::pagination::DEFAULT_PER_PAGE;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Client configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the remote catalog service
    pub api_base_url: String,
    /// Bearer token for the catalog service, if authentication is required
    pub api_token: Option<String>,
    /// SQLite URL for local meal plan and shopping list storage
    pub database_url: String,
    /// Catalog page size
    pub per_page: u32,
    /// Remote request timeout in seconds
    pub http_timeout_secs: u64,
    /// Log verbosity
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            api_token: None,
            database_url: "sqlite:larder.db".into(),
            per_page: DEFAULT_PER_PAGE,
            http_timeout_secs: 30,
            log_level: LogLevel::Info,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, validating as we go
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("LARDER_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Ok(token) = env::var("LARDER_API_TOKEN") {
            if !token.is_empty() {
                config.api_token = Some(token);
            }
        }
        if let Ok(url) = env::var("LARDER_DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(per_page) = env::var("LARDER_PER_PAGE") {
            config.per_page = per_page
                .parse()
                .map_err(|_| AppError::config(format!("invalid LARDER_PER_PAGE: {per_page}")))?;
        }
        if let Ok(timeout) = env::var("LARDER_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = timeout.parse().map_err(|_| {
                AppError::config(format!("invalid LARDER_HTTP_TIMEOUT_SECS: {timeout}"))
            })?;
        }
        if let Ok(level) = env::var("LARDER_LOG_LEVEL") {
            config.log_level = LogLevel::from_str_or_default(&level);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.api_base_url)
            .map_err(|e| AppError::config(format!("invalid LARDER_API_BASE_URL: {e}")))?;
        if self.per_page == 0 {
            return Err(AppError::config("LARDER_PER_PAGE must be positive"));
        }
        if self.http_timeout_secs == 0 {
            return Err(AppError::config("LARDER_HTTP_TIMEOUT_SECS must be positive"));
        }
        Ok(())
    }
}
