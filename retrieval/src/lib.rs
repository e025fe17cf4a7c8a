//! # Retrieval
//!
//! Retrieval-augmented generation over a single document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         RagPipeline                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  build:   Document ──► RecursiveSplitter ──► EmbeddingIndex     │
//! │                                                  │              │
//! │  answer:  query ──► Retriever ◄──────────────────┘              │
//! │                        │                                        │
//! │                        ▼                                        │
//! │               assemble_context ──► AnswerGenerator ──► Answer   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An empty retrieval result short-circuits to [`Answer::NoRelevantContext`]
//! without calling the chat model.

pub mod answer;
pub mod config;
pub mod context;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod retriever;

#[cfg(test)]
mod testing;

pub use answer::{AnswerGenerator, EMPTY_ANSWER, GROUNDED_INSTRUCTION};
pub use config::RetrievalConfig;
pub use context::{AssembledContext, CHUNK_SEPARATOR, assemble, assemble_context};
pub use error::{Result, RetrievalError};
pub use index::{EmbeddingIndex, ScoredChunk};
pub use pipeline::{Answer, RagPipeline};
pub use retriever::{Retriever, VectorRetriever};
