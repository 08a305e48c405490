// ABOUTME: Unified error handling system with error codes and convenience constructors
// ABOUTME: Defines AppError, ErrorCode, and the AppResult alias used across the engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the larder
//! engine. It defines standard error types and error codes so that every
//! component surfaces failures the same way: remote transport/decoding
//! failures become recoverable user-visible errors, validation failures block
//! the offending action synchronously, and state-guard rejections never reach
//! this module at all (they are silent no-ops by design).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (1000-1999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 1000,
    #[serde(rename = "INVALID_DATE_RANGE")]
    InvalidDateRange = 1001,
    #[serde(rename = "INVALID_RECIPE_DRAFT")]
    InvalidRecipeDraft = 1002,

    // Resource Management (2000-2999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 2000,

    // Remote Catalog Service (3000-3999)
    #[serde(rename = "REMOTE_SERVICE_ERROR")]
    RemoteServiceError = 3000,
    #[serde(rename = "REMOTE_DECODE_ERROR")]
    RemoteDecodeError = 3001,

    // Configuration (4000-4999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 4000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Whether a retry of the failed operation can reasonably succeed.
    ///
    /// Transport and decoding failures are recoverable by retry from the
    /// caller; validation and configuration failures are not until the input
    /// changes.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RemoteServiceError | Self::RemoteDecodeError | Self::DatabaseError
        )
    }

    /// Get a human-readable description of the error code
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Invalid input provided",
            Self::InvalidDateRange => "End date precedes start date",
            Self::InvalidRecipeDraft => "Recipe draft failed validation",
            Self::ResourceNotFound => "Resource not found",
            Self::RemoteServiceError => "Remote catalog service error",
            Self::RemoteDecodeError => "Failed to decode remote response",
            Self::ConfigError => "Configuration error",
            Self::InternalError => "Internal error",
            Self::DatabaseError => "Database error",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether retrying the failed operation can reasonably succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// End date precedes start date
    pub fn invalid_date_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidDateRange, message)
    }

    /// Recipe draft failed validation
    pub fn invalid_recipe_draft(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRecipeDraft, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Remote catalog service failure
    pub fn remote_service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RemoteServiceError, message)
    }

    /// Remote response decoding failure
    pub fn remote_decode(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RemoteDecodeError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::new(ErrorCode::RemoteDecodeError, error.to_string()).with_source(error)
        } else {
            Self::new(ErrorCode::RemoteServiceError, error.to_string()).with_source(error)
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::new(ErrorCode::DatabaseError, error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::RemoteDecodeError, error.to_string()).with_source(error)
    }
}

/// Conversion from `anyhow::Error` for binary-edge integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_retryability() {
        assert!(ErrorCode::RemoteServiceError.is_retryable());
        assert!(ErrorCode::DatabaseError.is_retryable());
        assert!(!ErrorCode::InvalidDateRange.is_retryable());
        assert!(!ErrorCode::ConfigError.is_retryable());
    }

    #[test]
    fn test_app_error_creation() {
        let error = AppError::not_found("Recipe 42");
        assert_eq!(error.code, ErrorCode::ResourceNotFound);
        assert!(error.message.contains("Recipe 42"));
        assert!(error.source.is_none());
    }

    #[test]
    fn test_error_display_includes_description() {
        let error = AppError::invalid_date_range("2025-06-05 < 2025-06-10");
        let rendered = error.to_string();
        assert!(rendered.contains("End date precedes start date"));
        assert!(rendered.contains("2025-06-05"));
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::RemoteServiceError).unwrap();
        assert_eq!(json, "\"REMOTE_SERVICE_ERROR\"");
    }
}
