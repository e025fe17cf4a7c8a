//! Chunk embeddings and nearest-neighbour lookup.

use chainlab_embeddings::{EmbeddingError, EmbeddingProvider, SimilarityIndex};
use chainlab_ingest::Chunk;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RetrievalError};

/// A retrieved chunk with its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Chunks with their vectors, in chunk order. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    index: SimilarityIndex<Chunk>,
}

impl EmbeddingIndex {
    /// Embed `chunks` in batches of `batch_size` and index them.
    pub async fn build(
        embedder: &dyn EmbeddingProvider,
        chunks: Vec<Chunk>,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(RetrievalError::InvalidConfiguration(
                "embedding_batch_size must be positive".to_string(),
            ));
        }

        let total = chunks.len();
        let mut index = SimilarityIndex::new();
        let mut pending = chunks.into_iter();

        loop {
            let batch: Vec<Chunk> = pending.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }

            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = embedder
                .embed_batch(&texts)
                .await
                .map_err(RetrievalError::EmbeddingUnavailable)?;

            if vectors.len() != batch.len() {
                return Err(RetrievalError::EmbeddingUnavailable(
                    EmbeddingError::InvalidResponse(format!(
                        "expected {} embeddings, got {}",
                        batch.len(),
                        vectors.len()
                    )),
                ));
            }

            for (chunk, vector) in batch.into_iter().zip(vectors) {
                index
                    .add(chunk, vector)
                    .map_err(RetrievalError::EmbeddingUnavailable)?;
            }
            debug!("Indexed {}/{} chunks", index.len(), total);
        }

        info!(
            "Built embedding index with {} chunks using {}",
            index.len(),
            embedder.model()
        );
        Ok(Self { index })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Indexed chunks in build order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.index.entries().iter().map(|entry| &entry.item)
    }

    /// The `k` chunks most similar to `text`, best first.
    ///
    /// An empty index answers with no chunks and never calls the embedder.
    pub async fn query(
        &self,
        embedder: &dyn EmbeddingProvider,
        text: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(RetrievalError::InvalidConfiguration(
                "k must be at least 1".to_string(),
            ));
        }
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let vector = embedder
            .embed(text)
            .await
            .map_err(RetrievalError::EmbeddingUnavailable)?;

        let hits = self
            .index
            .search(&vector, k)
            .map_err(RetrievalError::EmbeddingUnavailable)?;

        Ok(hits
            .into_iter()
            .map(|hit| ScoredChunk {
                chunk: hit.item.clone(),
                score: hit.score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEmbedder;
    use pretty_assertions::assert_eq;

    fn chunk(text: &str, offset: usize) -> Chunk {
        Chunk {
            text: text.to_string(),
            source_offset: offset,
            source_length: text.chars().count(),
            page: 1,
        }
    }

    fn three_chunks() -> (ScriptedEmbedder, Vec<Chunk>) {
        let embedder = ScriptedEmbedder::new([
            ("alpha", vec![1.0, 0.0, 0.0]),
            ("beta", vec![0.0, 1.0, 0.0]),
            ("gamma", vec![0.6, 0.8, 0.0]),
            ("question about beta", vec![0.0, 1.0, 0.1]),
        ]);
        let chunks = vec![chunk("alpha", 0), chunk("beta", 10), chunk("gamma", 20)];
        (embedder, chunks)
    }

    #[tokio::test]
    async fn test_query_ranks_by_cosine() {
        let (embedder, chunks) = three_chunks();
        let index = EmbeddingIndex::build(&embedder, chunks, 64).await.unwrap();

        let hits = index
            .query(&embedder, "question about beta", 2)
            .await
            .unwrap();
        let texts: Vec<&str> = hits.iter().map(|h| h.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["beta", "gamma"]);
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_k_larger_than_index_returns_all() {
        let embedder = ScriptedEmbedder::new([
            ("one", vec![1.0, 0.0]),
            ("two", vec![0.0, 1.0]),
            ("q", vec![1.0, 1.0]),
        ]);
        let index = EmbeddingIndex::build(&embedder, vec![chunk("one", 0), chunk("two", 5)], 8)
            .await
            .unwrap();

        let hits = index.query(&embedder, "q", 4).await.unwrap();
        assert_eq!(hits.len(), 2);
        // Equal scores keep chunk order.
        assert_eq!(hits[0].chunk.text, "one");
        assert_eq!(hits[1].chunk.text, "two");
    }

    #[tokio::test]
    async fn test_empty_index_skips_embedder() {
        let embedder = ScriptedEmbedder::unavailable();
        let index = EmbeddingIndex::build(&embedder, Vec::new(), 8).await.unwrap();

        let hits = index.query(&embedder, "anything", 3).await.unwrap();
        assert!(hits.is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_k_is_invalid() {
        let index = EmbeddingIndex::default();
        let err = index
            .query(&ScriptedEmbedder::default(), "q", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_build_batches_requests() {
        let (embedder, chunks) = three_chunks();
        let index = EmbeddingIndex::build(&embedder, chunks.clone(), 2)
            .await
            .unwrap();

        assert_eq!(*embedder.batches.lock().unwrap(), vec![2, 1]);
        assert_eq!(index.chunks().cloned().collect::<Vec<_>>(), chunks);
    }

    #[tokio::test]
    async fn test_rebuild_is_identical() {
        let (embedder, chunks) = three_chunks();
        let first = EmbeddingIndex::build(&embedder, chunks.clone(), 64)
            .await
            .unwrap();
        let second = EmbeddingIndex::build(&embedder, chunks, 64).await.unwrap();

        let a = first.query(&embedder, "question about beta", 3).await.unwrap();
        let b = second.query(&embedder, "question about beta", 3).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_embedder_failure_is_surfaced() {
        let err = EmbeddingIndex::build(&ScriptedEmbedder::unavailable(), vec![chunk("x", 0)], 8)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::EmbeddingUnavailable(EmbeddingError::ApiRequest { status: 503, .. })
        ));
    }
}
