//! Retrieval strategies.

use std::sync::Arc;

use async_trait::async_trait;
use chainlab_embeddings::EmbeddingProvider;
use tracing::debug;

use crate::error::{Result, RetrievalError};
use crate::index::{EmbeddingIndex, ScoredChunk};

/// Finds the chunks relevant to a query.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// At most `k` chunks, best first. `k` must be at least 1.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>>;
}

/// Cosine-similarity retrieval over an [`EmbeddingIndex`].
#[derive(Clone)]
pub struct VectorRetriever {
    index: Arc<EmbeddingIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorRetriever {
    /// `embedder` must be the provider the index was built with.
    pub fn new(index: Arc<EmbeddingIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }
}

#[async_trait]
impl Retriever for VectorRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(RetrievalError::InvalidConfiguration(
                "k must be at least 1".to_string(),
            ));
        }

        let hits = self.index.query(self.embedder.as_ref(), query, k).await?;
        debug!("Retrieved {} of {} chunks", hits.len(), self.index.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEmbedder;
    use chainlab_ingest::Chunk;
    use pretty_assertions::assert_eq;

    async fn retriever() -> (VectorRetriever, Arc<ScriptedEmbedder>) {
        let embedder = Arc::new(ScriptedEmbedder::new([
            ("dosage", vec![1.0, 0.0]),
            ("side effects", vec![0.0, 1.0]),
            ("how much to take", vec![0.9, 0.1]),
        ]));
        let chunks = ["dosage", "side effects"]
            .into_iter()
            .map(|text| Chunk {
                text: text.to_string(),
                source_offset: 0,
                source_length: text.chars().count(),
                page: 1,
            })
            .collect();
        let index = EmbeddingIndex::build(embedder.as_ref(), chunks, 8)
            .await
            .unwrap();
        (
            VectorRetriever::new(Arc::new(index), embedder.clone()),
            embedder,
        )
    }

    #[tokio::test]
    async fn test_retrieve_best_first() {
        let (retriever, _) = retriever().await;
        let hits = retriever.retrieve("how much to take", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.text, "dosage");
    }

    #[tokio::test]
    async fn test_zero_k_rejected_before_embedding() {
        let (retriever, embedder) = retriever().await;
        let calls = embedder.calls();

        let err = retriever.retrieve("how much to take", 0).await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidConfiguration(_)));
        assert_eq!(embedder.calls(), calls);
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let (retriever, _) = retriever().await;
        let retriever: Arc<dyn Retriever> = Arc::new(retriever);
        let hits = retriever.retrieve("how much to take", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
    }
}
