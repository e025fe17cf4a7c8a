//! Chat request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LlmError, Result};
use crate::message::{ChatMessage, ToolCall};

/// A tool the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,

    /// JSON Schema of the arguments object.
    pub parameters: Value,
}

/// Output format constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema {
        name: String,
        schema: Value,
        strict: bool,
    },
}

/// A single chat-completion request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,

    /// Overrides the model's default temperature when set.
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub tools: Vec<ToolDefinition>,
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// What the model produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatResponse {
    /// Non-empty text reply.
    Text(String),

    /// One or more tool calls and no text.
    ToolCalls(Vec<ToolCall>),

    /// Neither text nor tool calls.
    Empty,
}

impl ChatResponse {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Plain text of a reply. `Empty` reads as an empty string.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Empty => Ok(String::new()),
            Self::ToolCalls(calls) => {
                let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
                Err(LlmError::UnexpectedToolCall(names.join(", ")))
            }
        }
    }

    /// The assistant turn to record in a conversation.
    pub fn to_message(&self) -> ChatMessage {
        match self {
            Self::Text(text) => ChatMessage::assistant(text.clone()),
            Self::ToolCalls(calls) => ChatMessage::assistant_tool_calls(calls.clone()),
            Self::Empty => ChatMessage::Assistant {
                content: None,
                tool_calls: Vec::new(),
            },
        }
    }
}
