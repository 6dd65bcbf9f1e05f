//! Core error types for yusnote-core.
//!
//! Malformed stored strings (plans, history keys, day counters) are errors.
//! Out-of-range stage and feedback values are normalized by the callers of
//! these types and never show up here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for yusnote-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Review plan errors
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Activity history errors
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while interpreting a review plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    /// The plan string is empty or holds a token that is not a finite number.
    #[error("Malformed review plan '{plan}': {reason}")]
    MalformedPlan { plan: String, reason: String },
}

/// Errors raised while updating an activity history.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// A stored month key is not `YYYY-MM`.
    #[error("Malformed history month key '{key}'")]
    MalformedMonthKey { key: String },

    /// A stored month entry does not hold one integer counter per day.
    #[error("Malformed counters for month '{key}': {reason}")]
    MalformedCounters { key: String, reason: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ReviewError {
    pub(crate) fn malformed(plan: &str, reason: impl Into<String>) -> Self {
        ReviewError::MalformedPlan {
            plan: plan.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
