//! Similarity index for embedding lookups.

use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::{SimilarityResult, find_top_k};

/// An entry in the similarity index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry<T> {
    /// The indexed item.
    pub item: T,

    /// The embedding vector, exactly as the provider returned it.
    pub embedding: Embedding,
}

/// An insertion-ordered similarity index.
///
/// All embeddings must share one dimension, fixed by the first insert.
/// Search is exhaustive cosine similarity; ties rank in insertion order.
#[derive(Debug, Clone)]
pub struct SimilarityIndex<T> {
    entries: Vec<IndexEntry<T>>,
    dimension: Option<usize>,
}

impl<T> SimilarityIndex<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            dimension: None,
        }
    }

    /// Append an item with its embedding.
    pub fn add(&mut self, item: T, embedding: Embedding) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != embedding.len() => {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
            Some(_) => {}
            None => self.dimension = Some(embedding.len()),
        }

        self.entries.push(IndexEntry { item, embedding });
        debug!("Added entry {} to similarity index", self.entries.len() - 1);
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[IndexEntry<T>] {
        &self.entries
    }

    /// Find the `k` entries most similar to `query`.
    ///
    /// An empty index yields an empty result for any query.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SimilarityResult<&T>>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let ranked = find_top_k(
            query,
            self.entries.iter().map(|e| e.embedding.as_slice()),
            k,
        )?;

        Ok(ranked
            .into_iter()
            .map(|(position, score)| SimilarityResult {
                item: &self.entries[position].item,
                score,
                position,
            })
            .collect())
    }
}

impl<T> Default for SimilarityIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
