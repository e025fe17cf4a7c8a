//! # LLM
//!
//! A small chat-completion layer: messages, an OpenAI-compatible client,
//! prompt templates, schema-constrained replies and conversation memory.

pub mod error;
pub mod history;
pub mod message;
pub mod provider;
pub mod request;
pub mod structured;
pub mod template;

pub use error::{LlmError, Result};
pub use history::ChatHistory;
pub use message::{ChatMessage, Role, ToolCall};
pub use provider::{ChatModel, DEFAULT_CHAT_MODEL, OpenAIChatModel};
pub use request::{ChatRequest, ChatResponse, ResponseFormat, ToolDefinition};
pub use structured::StructuredOutput;
pub use template::{ChatPromptTemplate, PromptTemplate, Variables, variables};
