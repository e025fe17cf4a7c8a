//! Error types for the chat client.

use thiserror::Error;

/// Result type alias for chat operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur while talking to a chat model.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Provider not configured (usually a missing API key).
    #[error("chat provider not configured")]
    ProviderNotConfigured,

    /// The API answered with a non-success status.
    #[error("chat API returned {status}: {message}")]
    ApiRequest { status: u16, message: String },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Invalid response from provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The model declined to answer.
    #[error("model refused: {0}")]
    Refused(String),

    /// The model asked for a tool where plain text was expected.
    #[error("unexpected tool call: {0}")]
    UnexpectedToolCall(String),

    /// A template placeholder had no value.
    #[error("missing template variable: {0}")]
    MissingVariable(String),

    /// A template could not be parsed.
    #[error("invalid template: {0}")]
    Template(String),

    /// The reply did not match the requested schema.
    #[error("structured output error: {0}")]
    StructuredOutput(String),

    /// Serialization error.
    #[error("serialization error")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error.
    #[error("http error")]
    Http(#[from] reqwest::Error),
}
