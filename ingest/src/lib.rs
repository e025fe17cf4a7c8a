//! # Ingest
//!
//! Loads page-tagged text and cuts it into overlapping chunks, the unit of
//! retrieval for the RAG pipeline.
//!
//! ```text
//! Document { pages } ──► RecursiveSplitter ──► Chunk { text, offset, length, page }
//! ```

pub mod chunker;
pub mod document;
pub mod error;

pub use chunker::{Chunk, Chunks, DEFAULT_SEPARATORS, RecursiveSplitter};
pub use document::{Document, PAGE_BREAK, Page};
pub use error::{IngestError, Result};
