//! Tool-calling hospital assistant.
//!
//! The assistant model may answer directly or call `generate_patient`. A tool
//! result is summarized by a second model that only sees the tool output.
//! With memory on, the conversation is kept and an earlier patient record is
//! reused instead of running the tool again.

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chainlab_llm::{ChatHistory, ChatMessage, ChatModel, ChatRequest, ChatResponse, ToolCall};
use chainlab_tools::{ToolExecutor, ToolKind, ToolRegistry};
use tracing::{debug, info};

use crate::repl::ChatSession;

pub const ASSISTANT_INSTRUCTION: &str = "You are a hospital assistant. \
When asked about patient information, use the 'generate_patient' tool to retrieve patient records.";

pub const MEMORY_ASSISTANT_INSTRUCTION: &str = "You are a hospital assistant. \
First, look at the conversation and any prior tool outputs for patient information. \
Only call the 'generate_patient' tool if the requested patient data is not already in the chat history.";

pub const SUMMARY_INSTRUCTION: &str = "You summarize patient information using only the data provided. \
Do not add or infer any missing details.";

const NO_SUMMARY: &str = "No summary produced.";
const NO_RESPONSE: &str = "No response.";

pub struct HospitalSession {
    assistant: Arc<dyn ChatModel>,
    summarizer: Arc<dyn ChatModel>,
    registry: ToolRegistry,
    executor: ToolExecutor,

    /// Kept only when memory is on.
    history: Option<ChatHistory>,
}

impl HospitalSession {
    pub fn start(
        assistant: Arc<dyn ChatModel>,
        summarizer: Arc<dyn ChatModel>,
        memory: bool,
    ) -> Self {
        info!(
            "Hospital session started ({})",
            if memory { "with memory" } else { "stateless" }
        );
        Self {
            assistant,
            summarizer,
            registry: ToolRegistry::new([ToolKind::GeneratePatient]),
            executor: ToolExecutor::new(),
            history: memory.then(ChatHistory::new),
        }
    }

    pub fn history(&self) -> Option<&ChatHistory> {
        self.history.as_ref()
    }

    fn instruction(&self) -> &'static str {
        if self.history.is_some() {
            MEMORY_ASSISTANT_INSTRUCTION
        } else {
            ASSISTANT_INSTRUCTION
        }
    }

    pub async fn handle(&mut self, message: &str) -> Result<String> {
        let mut messages = vec![ChatMessage::system(self.instruction())];
        match &self.history {
            Some(history) => messages.extend(history.conversation_with(message)),
            None => messages.push(ChatMessage::user(message)),
        }

        let request = ChatRequest::new(messages).with_tools(self.registry.definitions());
        let response = self.assistant.chat(request).await?;
        debug!("Assistant replied: {response:?}");

        let reply = response.to_message();
        let calls = match response {
            ChatResponse::Text(text) => {
                self.record_turn(message, reply, &[], "");
                return Ok(format!("From Model:{text}"));
            }
            ChatResponse::Empty => {
                self.record_turn(message, reply, &[], "");
                return Ok(NO_RESPONSE.to_string());
            }
            ChatResponse::ToolCalls(calls) => calls,
        };

        // A turn whose tool cannot run is not remembered at all.
        let output = self.tool_output(&calls).await?;
        self.record_turn(message, reply, &calls, &output);

        let prompt = format!("Create a simple clinical note from this information only: {output}");
        let summary = self.summarizer.invoke(SUMMARY_INSTRUCTION, &prompt).await?;
        let summary = if summary.trim().is_empty() {
            NO_SUMMARY.to_string()
        } else {
            summary
        };

        Ok(format!(
            "From Tool:\n{output}\n\nFrom Model\n:Summary:{summary}"
        ))
    }

    /// Output for the first call, from history when memory already has it.
    async fn tool_output(&self, calls: &[ToolCall]) -> Result<String> {
        let Some(first) = calls.first() else {
            bail!("tool call response without calls");
        };
        let invocation = self.registry.resolve(first)?;

        let remembered = self
            .history
            .as_ref()
            .and_then(|h| h.last_tool_output(invocation.kind.name()));
        if let Some(output) = remembered {
            info!("Reusing earlier {} output", invocation.kind);
            return Ok(output.to_string());
        }

        Ok(self.executor.execute(&invocation).await?.content())
    }

    /// Append one finished exchange. Every call id gets `output` as its
    /// tool result so the conversation stays valid for the next request.
    fn record_turn(
        &mut self,
        message: &str,
        reply: ChatMessage,
        calls: &[ToolCall],
        output: &str,
    ) {
        let Some(history) = &mut self.history else {
            return;
        };
        history.push(ChatMessage::user(message));
        history.push(reply);
        for call in calls {
            history.push(ChatMessage::tool_result(call, output));
        }
    }

    pub fn end(self) {
        let turns = self.history.as_ref().map_or(0, ChatHistory::len);
        info!("Hospital session ended ({turns} messages remembered)");
    }
}

#[async_trait]
impl ChatSession for HospitalSession {
    fn banner(&self) -> String {
        "Hospital assistant. Ask about a patient, /quit to leave.".to_string()
    }

    async fn respond(&mut self, line: &str) -> Result<String> {
        self.handle(line).await
    }
}
