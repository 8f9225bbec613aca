//! Error types for Tether

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TetherError
pub type Result<T> = std::result::Result<T, TetherError>;

/// Main error type for Tether operations
#[derive(Debug, Error)]
pub enum TetherError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A deferred value failed to resolve
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Config file flavour that cannot be loaded
    #[error("Cannot load {kind} config at {path}: {reason}")]
    UnsupportedConfigType {
        path: PathBuf,
        kind: String,
        reason: String,
    },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of an asynchronously resolved config value.
///
/// Cloneable so every awaiter of a shared resolution receives the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// External tool could not be located
    #[error("Required tool '{tool}' not found. {hint}")]
    ToolNotFound { tool: String, hint: String },

    /// Expected project path does not exist
    #[error("{what} not found at {path}")]
    PathNotFound { what: String, path: PathBuf },

    /// Any other resolution failure
    #[error("Resolution failed: {0}")]
    Failed(String),
}

impl ResolveError {
    /// Create a tool not found error with install hint
    pub fn tool_not_found(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::ToolNotFound {
            tool: tool.into(),
            hint: hint.into(),
        }
    }

    /// Create a path not found error
    pub fn path_not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound {
            what: what.into(),
            path: path.into(),
        }
    }
}
