//! Error types for sl-core

use thiserror::Error;

/// Core error type for Starlift
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Empty name where a non-empty one is required
    #[error("[E003] Empty name: {context}")]
    EmptyName { context: String },

    /// E004: Edge references a task that was never added to the graph
    #[error("[E004] Unknown task '{name}' referenced in edge")]
    UnknownTask { name: String },

    /// E005: Duplicate task id within one pipeline
    #[error("[E005] Duplicate task id: {name}")]
    DuplicateTask { name: String },

    /// E006: Circular dependency detected
    #[error("[E006] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E007: IO error
    #[error("[E007] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E009: Config/YAML parse error
    #[error("[E009] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
