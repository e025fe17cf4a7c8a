//! Document question answering with a retrieval toggle.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chainlab_embeddings::EmbeddingProvider;
use chainlab_ingest::Document;
use chainlab_llm::ChatModel;
use chainlab_retrieval::{Answer, EMPTY_ANSWER, RagPipeline, RetrievalConfig};
use tracing::info;

use crate::repl::ChatSession;

/// Instruction for the model when retrieval is off.
pub const GENERAL_INSTRUCTION: &str =
    "You are a helpful assistant. Answer using general knowledge.";

/// Reply when retrieval finds nothing.
pub const NO_CONTEXT_REPLY: &str =
    "No relevant information found in the document while RAG is enabled.";

/// One user's conversation about one document.
pub struct RagSession {
    pipeline: RagPipeline,
    general: Arc<dyn ChatModel>,
    use_retrieval: bool,
    source: String,
}

impl RagSession {
    /// Index `document` and open a session.
    pub async fn start(
        config: RetrievalConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn ChatModel>,
        document: &Document,
    ) -> Result<Self> {
        let use_retrieval = config.use_retrieval;
        let pipeline = RagPipeline::build(config, embedder, model.clone(), document).await?;
        let source = document
            .source
            .clone()
            .unwrap_or_else(|| "document".to_string());

        info!("RAG session started for {source}");
        Ok(Self {
            pipeline,
            general: model,
            use_retrieval,
            source,
        })
    }

    pub fn use_retrieval(&self) -> bool {
        self.use_retrieval
    }

    pub fn set_use_retrieval(&mut self, enabled: bool) {
        info!("Retrieval {}", if enabled { "enabled" } else { "disabled" });
        self.use_retrieval = enabled;
    }

    /// Answer a question the way the current toggle says.
    pub async fn ask(&self, question: &str) -> Result<String> {
        if !self.use_retrieval {
            let text = self.general.invoke(GENERAL_INSTRUCTION, question).await?;
            return Ok(non_empty(text));
        }

        match self.pipeline.answer(question).await? {
            Answer::Generated { text, .. } => Ok(text),
            Answer::NoRelevantContext => Ok(NO_CONTEXT_REPLY.to_string()),
        }
    }

    pub fn end(self) {
        info!("RAG session for {} ended", self.source);
    }
}

fn non_empty(text: String) -> String {
    if text.trim().is_empty() {
        EMPTY_ANSWER.to_string()
    } else {
        text
    }
}

#[async_trait]
impl ChatSession for RagSession {
    fn banner(&self) -> String {
        format!(
            "Ask about {}. Retrieval is {}. Commands: /rag on, /rag off, /quit",
            self.source,
            if self.use_retrieval { "on" } else { "off" }
        )
    }

    async fn respond(&mut self, line: &str) -> Result<String> {
        let mut words = line.split_whitespace();
        if words.next() != Some("/rag") {
            return self.ask(line).await;
        }

        match (words.next(), words.next()) {
            (Some("on"), None) => {
                self.set_use_retrieval(true);
                Ok("Retrieval enabled.".to_string())
            }
            (Some("off"), None) => {
                self.set_use_retrieval(false);
                Ok("Retrieval disabled.".to_string())
            }
            _ => Ok("Usage: /rag on | /rag off".to_string()),
        }
    }
}
