//! In-memory embedder and chat model for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chainlab_embeddings::{Embedding, EmbeddingError, EmbeddingProvider};
use chainlab_llm::{ChatModel, ChatRequest, ChatResponse, LlmError};

/// Returns a fixed vector per text.
#[derive(Default)]
pub(crate) struct ScriptedEmbedder {
    vectors: HashMap<String, Embedding>,
    unavailable: bool,
    pub(crate) batches: Mutex<Vec<usize>>,
}

impl ScriptedEmbedder {
    pub(crate) fn new<'a>(vectors: impl IntoIterator<Item = (&'a str, Vec<f32>)>) -> Self {
        Self {
            vectors: vectors
                .into_iter()
                .map(|(text, vector)| (text.to_string(), vector))
                .collect(),
            ..Default::default()
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn embed_batch(&self, texts: &[String]) -> chainlab_embeddings::Result<Vec<Embedding>> {
        self.batches.lock().unwrap().push(texts.len());
        if self.unavailable {
            return Err(EmbeddingError::ApiRequest {
                status: 503,
                message: "down".to_string(),
            });
        }
        texts
            .iter()
            .map(|text| {
                self.vectors
                    .get(text)
                    .cloned()
                    .ok_or_else(|| EmbeddingError::InvalidResponse(format!("no vector for {text}")))
            })
            .collect()
    }
}

/// Replies with the same text and records every request.
pub(crate) struct ScriptedModel {
    reply: Option<String>,
    calls: AtomicUsize,
    pub(crate) requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> chainlab_llm::Result<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Some(text) if text.is_empty() => Ok(ChatResponse::Empty),
            Some(text) => Ok(ChatResponse::Text(text.clone())),
            None => Err(LlmError::ApiRequest {
                status: 500,
                message: "model offline".to_string(),
            }),
        }
    }
}
