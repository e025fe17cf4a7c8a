//! Configuration for the RAG pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};

/// Chunking, retrieval and context parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunk window in chars.
    pub chunk_size: usize,

    /// Chars shared by adjacent chunks.
    pub chunk_overlap: usize,

    /// Chunks retrieved per question.
    pub top_k: usize,

    /// Upper bound on the assembled context, in chars.
    pub max_context_chars: usize,

    /// Texts sent per embedding request while indexing.
    pub embedding_batch_size: usize,

    /// Whether the REPL starts with retrieval switched on.
    pub use_retrieval: bool,
}

impl RetrievalConfig {
    /// Set chunk size and overlap.
    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    /// Set the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the context bound.
    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    /// Set the indexing batch size.
    pub fn with_embedding_batch_size(mut self, batch_size: usize) -> Self {
        self.embedding_batch_size = batch_size;
        self
    }

    /// Reject parameters the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size must be positive"));
        }
        if self.chunk_overlap == 0 {
            return Err(invalid("chunk_overlap must be positive"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(invalid(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(invalid("top_k must be at least 1"));
        }
        if self.max_context_chars == 0 {
            return Err(invalid("max_context_chars must be positive"));
        }
        if self.embedding_batch_size == 0 {
            return Err(invalid("embedding_batch_size must be positive"));
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 120,
            top_k: 4,
            max_context_chars: 8000,
            embedding_batch_size: 64,
            use_retrieval: true,
        }
    }
}

fn invalid(message: impl Into<String>) -> RetrievalError {
    RetrievalError::InvalidConfiguration(message.into())
}
