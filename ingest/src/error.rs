//! Error types for document ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while loading or chunking documents.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Chunking parameters are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A document could not be read.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
