//! The end-to-end question answering flow.
//!
//! Build once: document -> chunks -> embedding index. Then per question:
//! retrieve -> assemble context -> generate.

use std::sync::Arc;

use chainlab_embeddings::EmbeddingProvider;
use chainlab_ingest::{Document, RecursiveSplitter};
use chainlab_llm::ChatModel;
use tracing::{debug, info};

use crate::answer::AnswerGenerator;
use crate::config::RetrievalConfig;
use crate::context::assemble_context;
use crate::error::{Result, RetrievalError};
use crate::index::{EmbeddingIndex, ScoredChunk};
use crate::retriever::{Retriever, VectorRetriever};

/// Outcome of asking the pipeline a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// The model answered from the listed chunks.
    Generated {
        text: String,
        sources: Vec<ScoredChunk>,
    },

    /// Retrieval found nothing, so the model was not asked.
    NoRelevantContext,
}

/// Retrieval-augmented question answering over one document.
pub struct RagPipeline {
    config: RetrievalConfig,
    retriever: Arc<dyn Retriever>,
    generator: AnswerGenerator,
}

impl RagPipeline {
    /// Chunk and embed `document`, then wire up retrieval and generation.
    pub async fn build(
        config: RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn ChatModel>,
        document: &Document,
    ) -> Result<Self> {
        config.validate()?;

        let splitter = RecursiveSplitter::new(config.chunk_size, config.chunk_overlap)
            .map_err(|e| RetrievalError::InvalidConfiguration(e.to_string()))?;
        let chunks = splitter.split(document);
        info!(
            "Split {} pages into {} chunks",
            document.pages.len(),
            chunks.len()
        );

        let index =
            EmbeddingIndex::build(embedder.as_ref(), chunks, config.embedding_batch_size).await?;
        let retriever = VectorRetriever::new(Arc::new(index), embedder);

        Ok(Self::with_retriever(
            config,
            Arc::new(retriever),
            AnswerGenerator::new(model),
        ))
    }

    /// Assemble a pipeline from parts.
    pub fn with_retriever(
        config: RetrievalConfig,
        retriever: Arc<dyn Retriever>,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            config,
            retriever,
            generator,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn generator(&self) -> &AnswerGenerator {
        &self.generator
    }

    /// Answer with the configured `top_k` and context bound.
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        self.answer_with(query, self.config.top_k, self.config.max_context_chars)
            .await
    }

    pub async fn answer_with(
        &self,
        query: &str,
        k: usize,
        max_context_chars: usize,
    ) -> Result<Answer> {
        let hits = self.retriever.retrieve(query, k).await?;
        if hits.is_empty() {
            info!("No relevant context for query");
            return Ok(Answer::NoRelevantContext);
        }

        let context = assemble_context(&hits, max_context_chars);
        debug!(
            "Using {} of {} retrieved chunks ({} chars)",
            context.used,
            hits.len(),
            context.text.chars().count()
        );

        let text = self.generator.generate(query, &context.text).await?;
        let mut sources = hits;
        sources.truncate(context.used);

        Ok(Answer::Generated { text, sources })
    }
}
