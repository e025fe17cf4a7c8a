//! Chat messages and tool calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speaker of a templated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id, echoed back with the tool result.
    pub id: String,

    /// Name of the tool to run.
    pub name: String,

    /// Decoded JSON arguments.
    pub arguments: Value,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        name: String,
        content: String,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// An assistant turn that only requests tools.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: None,
            tool_calls,
        }
    }

    /// The result of running a tool, answering `call`.
    pub fn tool_result(call: &ToolCall, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: call.id.clone(),
            name: call.name.clone(),
            content: content.into(),
        }
    }

    /// Build a message for a templated role.
    pub fn with_role(role: Role, content: impl Into<String>) -> Self {
        match role {
            Role::System => Self::system(content),
            Role::User => Self::user(content),
            Role::Assistant => Self::assistant(content),
        }
    }

    /// Text content, if the message carries any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::User { content } | Self::Tool { content, .. } => {
                Some(content)
            }
            Self::Assistant { content, .. } => content.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tool_result_echoes_call() {
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "generate_patient".to_string(),
            arguments: json!({}),
        };

        let message = ChatMessage::tool_result(&call, "{\"name\":\"John Smith\"}");
        assert_eq!(message, ChatMessage::Tool {
            tool_call_id: "call_1".to_string(),
            name: "generate_patient".to_string(),
            content: "{\"name\":\"John Smith\"}".to_string(),
        });
        assert_eq!(message.content(), Some("{\"name\":\"John Smith\"}"));
    }

    #[test]
    fn test_tool_call_turn_has_no_content() {
        let message = ChatMessage::assistant_tool_calls(vec![]);
        assert_eq!(message.content(), None);
    }

    #[test]
    fn test_serde_tagged_by_role() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }
}
