//! Error types for tool dispatch.

use thiserror::Error;

/// Result type alias for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors that can occur while resolving or running a tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The model named a tool that is not enabled.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// Arguments are not a JSON object.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error.
    #[error("serialization error")]
    Serialization(#[from] serde_json::Error),
}
