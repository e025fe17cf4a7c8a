//! Error types for the RAG pipeline.

use chainlab_embeddings::EmbeddingError;
use chainlab_llm::LlmError;
use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors surfaced by indexing, retrieval and answering.
///
/// Finding nothing relevant is not an error; see `Answer::NoRelevantContext`.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Parameters are unusable. Fix them before indexing.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The embedding service failed.
    #[error("embedding service unavailable")]
    EmbeddingUnavailable(#[source] EmbeddingError),

    /// The chat model failed to answer.
    #[error("answer generation failed")]
    GenerationFailed(#[source] LlmError),
}
