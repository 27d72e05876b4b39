// src/error.rs

//! Unified error handling for the complaint monitor.

use std::fmt;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Complaint list did not appear within the wait bound
    #[error("Timed out after {waited_ms}ms waiting for complaints at {url}")]
    FetchTimeout { url: String, waited_ms: u128 },

    /// Persisted snapshot could not be read or decoded
    #[error("Corrupt snapshot at {location}: {message}")]
    CorruptState { location: String, message: String },

    /// Snapshot could not be written
    #[error("Failed to persist snapshot to {location}: {message}")]
    Persist { location: String, message: String },

    /// Renderer could not be initialized at all
    #[error("Renderer initialization failed: {0}")]
    RendererInit(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a corrupt state error for a snapshot location.
    pub fn corrupt(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::CorruptState {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create a persistence error for a snapshot location.
    pub fn persist(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Persist {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create a renderer initialization error.
    pub fn renderer_init(message: impl fmt::Display) -> Self {
        Self::RendererInit(message.to_string())
    }

    /// Whether this error makes every future cycle fail as well.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RendererInit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_renderer_init_is_fatal() {
        assert!(AppError::renderer_init("no runtime").is_fatal());
        assert!(!AppError::persist("data.json", "disk full").is_fatal());
        assert!(
            !AppError::FetchTimeout {
                url: "https://example.com".into(),
                waited_ms: 20_000,
            }
            .is_fatal()
        );
    }

    #[test]
    fn messages_carry_context() {
        let err = AppError::corrupt("data.json", "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "Corrupt snapshot at data.json: expected value at line 1"
        );
    }
}
