//! # Embeddings
//!
//! Turns text into dense vectors through a hosted embedding API and answers
//! nearest-neighbour queries over them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► SimilarityIndex<T>         │
//! │       │                                   │                     │
//! │       ▼                                   ▼                     │
//! │  OpenAIProvider                  find_top_k (cosine)           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use index::{IndexEntry, SimilarityIndex};
pub use provider::{EmbeddingProvider, OpenAIProvider};
pub use similarity::{SimilarityResult, cosine_similarity};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Default embedding model (OpenAI `text-embedding-3-small`).
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
