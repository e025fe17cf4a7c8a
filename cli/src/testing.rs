//! Scripted services for session tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chainlab_embeddings::{Embedding, EmbeddingProvider};
use chainlab_llm::{ChatModel, ChatRequest, ChatResponse, ToolCall};

/// Plays back queued replies and records every request.
#[derive(Default)]
pub(crate) struct ScriptedChat {
    replies: Mutex<VecDeque<ChatResponse>>,
    pub(crate) requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub(crate) fn new(replies: impl IntoIterator<Item = ChatResponse>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    pub(crate) fn text(reply: &str) -> Self {
        Self::new([ChatResponse::Text(reply.to_string())])
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn request(&self, i: usize) -> ChatRequest {
        self.requests.lock().unwrap()[i].clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> chainlab_llm::Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ChatResponse::Empty))
    }
}

pub(crate) fn patient_call(id: &str) -> ChatResponse {
    ChatResponse::ToolCalls(vec![ToolCall {
        id: id.to_string(),
        name: "generate_patient".to_string(),
        arguments: serde_json::json!({}),
    }])
}

/// Embeds text by counting a few keywords.
pub(crate) struct KeywordEmbedder {
    keywords: Vec<&'static str>,
}

impl KeywordEmbedder {
    pub(crate) fn new(keywords: &[&'static str]) -> Self {
        Self {
            keywords: keywords.to_vec(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &str {
        "keywords"
    }

    fn model(&self) -> &str {
        "keywords"
    }

    async fn embed_batch(&self, texts: &[String]) -> chainlab_embeddings::Result<Vec<Embedding>> {
        Ok(texts
            .iter()
            .map(|text| {
                let text = text.to_lowercase();
                self.keywords
                    .iter()
                    .map(|k| text.matches(k).count() as f32)
                    .collect()
            })
            .collect())
    }
}
