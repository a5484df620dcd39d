//! Core error types for daybrief-core.
//!
//! This module defines the error hierarchy using thiserror. Pure
//! computation (classification, slot finding, assembly) never fails;
//! these types cover configuration, storage, and the source adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daybrief-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors from task/calendar/LLM source adapters
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Recap parsing errors
    #[error("Recap error: {0}")]
    Recap(#[from] RecapError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors raised by the external source adapters.
#[derive(Error, Debug)]
pub enum SourceError {
    /// No usable credentials for a service
    #[error("Not authenticated with {service}: {message}")]
    NotAuthenticated { service: String, message: String },

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// A service returned an unusable response
    #[error("{service} API error: {message}")]
    Api { service: String, message: String },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// External command missing from the system
    #[error("Command '{command}' not found: {hint}")]
    CommandNotFound { command: String, hint: String },

    /// External command exited non-zero
    #[error("Command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// External command exceeded its deadline
    #[error("Command '{command}' timed out after {timeout_secs}s")]
    CommandTimeout { command: String, timeout_secs: u64 },
}

impl SourceError {
    /// True for failures that mean "not signed in" rather than a
    /// transient or transport problem.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            SourceError::NotAuthenticated { .. } | SourceError::TokenRefreshFailed(_)
        )
    }
}

/// Recap markdown parsing errors.
///
/// Display strings are stable; callers match on them when reporting
/// malformed journal sections.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecapError {
    /// Document does not open with a frontmatter block
    #[error("missing frontmatter")]
    MissingFrontmatter,

    /// Frontmatter block is never closed
    #[error("incomplete frontmatter")]
    IncompleteFrontmatter,

    /// Date line is absent or unparseable
    #[error("invalid frontmatter date: {0}")]
    InvalidDate(String),

    /// Mode value is not a known recap mode
    #[error("unknown recap mode: {0}")]
    UnknownMode(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
