//! Grounded answer generation.

use std::sync::Arc;

use chainlab_llm::ChatModel;
use tracing::debug;

use crate::error::{Result, RetrievalError};

/// System instruction that keeps answers inside the retrieved context.
pub const GROUNDED_INSTRUCTION: &str = "You answer questions only with the provided context. \
If the context is insufficient, say you don't know.";

/// Shown when the model returns no text.
pub const EMPTY_ANSWER: &str = "No answer produced.";

/// Asks a chat model to answer from a given context.
#[derive(Clone)]
pub struct AnswerGenerator {
    model: Arc<dyn ChatModel>,
    instruction: String,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            instruction: GROUNDED_INSTRUCTION.to_string(),
        }
    }

    /// Replace the system instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn model(&self) -> &Arc<dyn ChatModel> {
        &self.model
    }

    /// The user message sent for `question`.
    pub fn prompt(question: &str, context: &str) -> String {
        format!(
            "Use only the context to answer the user's question.\n\n\
             Question: {question}\n\n\
             Context:\n{context}"
        )
    }

    pub async fn generate(&self, question: &str, context: &str) -> Result<String> {
        debug!(
            "Generating answer with {} ({} context chars)",
            self.model.model(),
            context.chars().count()
        );

        let text = self
            .model
            .invoke(&self.instruction, &Self::prompt(question, context))
            .await
            .map_err(RetrievalError::GenerationFailed)?;

        if text.trim().is_empty() {
            Ok(EMPTY_ANSWER.to_string())
        } else {
            Ok(text)
        }
    }
}
