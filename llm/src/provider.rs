//! Chat model providers.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::{LlmError, Result};
use crate::message::{ChatMessage, ToolCall};
use crate::request::{ChatRequest, ChatResponse, ResponseFormat, ToolDefinition};

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-mini";

/// Trait for chat-completion backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Run one chat completion.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Send a system instruction and one user message, expecting text back.
    ///
    /// An empty reply comes back as an empty string.
    async fn invoke(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest::new(vec![ChatMessage::system(system), ChatMessage::user(user)]);
        self.chat(request).await?.into_text()
    }
}

/// OpenAI-compatible chat completions client.
pub struct OpenAIChatModel {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
    model: String,

    /// Used when a request leaves the temperature unset.
    temperature: Option<f32>,
}

impl OpenAIChatModel {
    /// Create a new client reading the key from `OPENAI_API_KEY`.
    pub fn new() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            temperature: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Default sampling temperature for this model handle.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Check if the client has credentials.
    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = request.messages.iter().map(wire_message).collect();
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });

        if let Some(temperature) = request.temperature.or(self.temperature) {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if !request.tools.is_empty() {
            let tools: Vec<Value> = request.tools.iter().map(wire_tool).collect();
            body["tools"] = Value::Array(tools);
        }
        if let Some(format) = &request.response_format {
            body["response_format"] = wire_response_format(format);
        }

        body
    }
}

impl Default for OpenAIChatModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(LlmError::ProviderNotConfigured)?;

        debug!(
            "Sending {} messages to {} ({} tools)",
            request.messages.len(),
            self.model,
            request.tools.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request_body(&request))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiRequest {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        if let Some(usage) = &completion.usage {
            info!(
                "Chat completion from {} ({} tokens)",
                self.model, usage.total_tokens
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        into_response(choice.message)
    }
}

fn wire_message(message: &ChatMessage) -> Value {
    match message {
        ChatMessage::System { content } => json!({ "role": "system", "content": content }),
        ChatMessage::User { content } => json!({ "role": "user", "content": content }),
        ChatMessage::Assistant {
            content,
            tool_calls,
        } => {
            let mut value = json!({ "role": "assistant", "content": content });
            if !tool_calls.is_empty() {
                let calls: Vec<Value> = tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
                value["tool_calls"] = Value::Array(calls);
            }
            value
        }
        ChatMessage::Tool {
            tool_call_id,
            name,
            content,
        } => json!({
            "role": "tool",
            "tool_call_id": tool_call_id,
            "name": name,
            "content": content,
        }),
    }
}

fn wire_tool(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

fn wire_response_format(format: &ResponseFormat) -> Value {
    match format {
        ResponseFormat::Text => json!({ "type": "text" }),
        ResponseFormat::JsonObject => json!({ "type": "json_object" }),
        ResponseFormat::JsonSchema {
            name,
            schema,
            strict,
        } => json!({
            "type": "json_schema",
            "json_schema": { "name": name, "schema": schema, "strict": strict }
        }),
    }
}

fn into_response(message: CompletionMessage) -> Result<ChatResponse> {
    if let Some(text) = message.content.filter(|t| !t.trim().is_empty()) {
        if !message.tool_calls.is_empty() {
            warn!(
                "Reply has text and {} tool calls, keeping the text",
                message.tool_calls.len()
            );
        }
        return Ok(ChatResponse::Text(text));
    }

    if let Some(refusal) = message.refusal {
        return Err(LlmError::Refused(refusal));
    }

    if message.tool_calls.is_empty() {
        return Ok(ChatResponse::Empty);
    }

    let calls = message
        .tool_calls
        .into_iter()
        .map(|call| -> Result<ToolCall> {
            let raw = call.function.arguments.trim();
            let arguments = if raw.is_empty() {
                json!({})
            } else {
                serde_json::from_str(raw).map_err(|e| {
                    LlmError::InvalidResponse(format!(
                        "arguments for {} are not JSON: {e}",
                        call.function.name
                    ))
                })?
            };
            Ok(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ChatResponse::ToolCalls(calls))
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<CompletionToolCall>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionToolCall {
    id: String,
    function: CompletionFunction,
}

#[derive(Debug, Deserialize)]
struct CompletionFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model(server: &MockServer) -> OpenAIChatModel {
        OpenAIChatModel::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
    }

    fn reply(message: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": DEFAULT_CHAT_MODEL,
            "choices": [{ "index": 0, "message": message, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        }))
    }

    #[tokio::test]
    async fn test_invoke_returns_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": DEFAULT_CHAT_MODEL,
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .respond_with(reply(json!({ "role": "assistant", "content": "hi there" })))
            .expect(1)
            .mount(&server)
            .await;

        let text = model(&server).invoke("be brief", "hello").await.unwrap();
        assert_eq!(text, "hi there");
    }

    #[tokio::test]
    async fn test_tool_calls_are_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "tools": [{ "type": "function", "function": { "name": "generate_patient" } }]
            })))
            .respond_with(reply(json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "generate_patient", "arguments": "{}" }
                }]
            })))
            .mount(&server)
            .await;

        let request = ChatRequest::new(vec![ChatMessage::user("make a patient")]).with_tools(vec![
            ToolDefinition {
                name: "generate_patient".to_string(),
                description: "Generate a patient record".to_string(),
                parameters: json!({ "type": "object", "properties": {} }),
            },
        ]);

        let response = model(&server).chat(request).await.unwrap();
        assert_eq!(
            response,
            ChatResponse::ToolCalls(vec![ToolCall {
                id: "call_1".to_string(),
                name: "generate_patient".to_string(),
                arguments: json!({}),
            }])
        );
    }

    #[tokio::test]
    async fn test_blank_reply_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(reply(json!({ "role": "assistant", "content": "  " })))
            .mount(&server)
            .await;

        let response = model(&server)
            .chat(ChatRequest::new(vec![ChatMessage::user("?")]))
            .await
            .unwrap();
        assert_eq!(response, ChatResponse::Empty);
    }

    #[tokio::test]
    async fn test_default_temperature_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "temperature": 0.5 })))
            .respond_with(reply(json!({ "role": "assistant", "content": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let response = model(&server)
            .with_temperature(0.5)
            .chat(ChatRequest::new(vec![ChatMessage::user("?")]))
            .await
            .unwrap();
        assert_eq!(response.text(), Some("ok"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let err = model(&server).invoke("s", "u").await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::RateLimited {
                retry_after_secs: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = model(&server).invoke("s", "u").await.unwrap_err();
        assert!(matches!(err, LlmError::ApiRequest { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let model = OpenAIChatModel {
            api_key: None,
            ..OpenAIChatModel::new()
        };
        let err = model.invoke("s", "u").await.unwrap_err();
        assert!(matches!(err, LlmError::ProviderNotConfigured));
    }

    #[test]
    fn test_tool_history_wire_format() {
        let call = ToolCall {
            id: "call_9".to_string(),
            name: "generate_patient".to_string(),
            arguments: json!({}),
        };
        let assistant = wire_message(&ChatMessage::assistant_tool_calls(vec![call.clone()]));
        assert_eq!(assistant["tool_calls"][0]["function"]["arguments"], "{}");

        let tool = wire_message(&ChatMessage::tool_result(&call, "done"));
        assert_eq!(
            tool,
            json!({
                "role": "tool",
                "tool_call_id": "call_9",
                "name": "generate_patient",
                "content": "done",
            })
        );
    }
}
