//! Typed replies constrained by a JSON Schema.

use std::marker::PhantomData;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{LlmError, Result};
use crate::message::ChatMessage;
use crate::provider::ChatModel;
use crate::request::{ChatRequest, ResponseFormat};

/// Asks a model for a reply shaped like `T`.
pub struct StructuredOutput<T> {
    name: String,
    schema: serde_json::Value,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StructuredOutput<T>
where
    T: JsonSchema + DeserializeOwned,
{
    pub fn new() -> Result<Self> {
        let mut schema = serde_json::to_value(schemars::schema_for!(T))?;
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
        }

        // The API accepts letters, digits, '_' and '-' in schema names.
        let name = T::schema_name()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        Ok(Self {
            name,
            schema,
            _marker: PhantomData,
        })
    }

    pub fn schema(&self) -> &serde_json::Value {
        &self.schema
    }

    pub fn response_format(&self) -> ResponseFormat {
        ResponseFormat::JsonSchema {
            name: self.name.clone(),
            schema: self.schema.clone(),
            strict: false,
        }
    }

    /// Decode a reply, tolerating a surrounding markdown code fence.
    pub fn parse(&self, reply: &str) -> Result<T> {
        let body = strip_code_fence(reply);
        serde_json::from_str(body).map_err(|e| {
            LlmError::StructuredOutput(format!("{} does not match schema: {e}", self.name))
        })
    }

    /// Send `messages` and decode the reply.
    pub async fn invoke(
        &self,
        model: &dyn ChatModel,
        messages: Vec<ChatMessage>,
        temperature: Option<f32>,
    ) -> Result<T> {
        let mut request = ChatRequest::new(messages).with_response_format(self.response_format());
        request.temperature = temperature;

        debug!("Requesting structured {} from {}", self.name, model.model());
        let text = model.chat(request).await?.into_text()?;
        if text.trim().is_empty() {
            return Err(LlmError::StructuredOutput(format!(
                "empty reply for {}",
                self.name
            )));
        }
        self.parse(&text)
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json`.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
