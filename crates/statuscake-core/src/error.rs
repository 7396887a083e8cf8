//! Error types for the StatusCake provider
//!
//! This module defines all error types used throughout the crate.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP status the StatusCake API uses for missing resources
pub const NOT_FOUND_STATUS: u16 = 404;

/// Structured error returned by the StatusCake API
///
/// The API reports validation failures as a map of field name to a list of
/// human-readable messages. A `BTreeMap` keeps the field order stable so the
/// diagnostics derived from it are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code of the failed response
    #[serde(default)]
    pub status: u16,

    /// Top-level error message
    #[serde(default)]
    pub message: String,

    /// Field name → messages
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    /// Create an API error with no field-level messages
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }

    /// Attach a field-level message
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Whether the API reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status == NOT_FOUND_STATUS
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCake API error ({})", self.status)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        for (field, messages) in &self.errors {
            for message in messages {
                write!(f, "; {}: {}", field, message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Core error type for the StatusCake provider
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error payload returned by the StatusCake API
    #[error(transparent)]
    Api(#[from] ApiError),

    /// HTTP transport errors (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input, rejected before any remote call
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// The API error payload, if this error came from the StatusCake API
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this is an API "not found" error
    pub fn is_not_found(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = Error::from(ApiError::new(404, "Not found"));
        assert!(err.is_not_found());

        let err = Error::from(ApiError::new(400, "Bad request"));
        assert!(!err.is_not_found());

        let err = Error::http("connection refused");
        assert!(!err.is_not_found());
        assert!(err.as_api().is_none());
    }

    #[test]
    fn test_api_error_display_includes_field_messages() {
        let err = ApiError::new(400, "The provided parameters are invalid")
            .with_field_error("confirmation", "Confirmation must be no more than 3");

        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("confirmation: Confirmation must be no more than 3"));
    }
}
