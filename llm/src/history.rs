//! Conversation memory.

use crate::message::ChatMessage;

/// Messages exchanged so far, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The history followed by a new user turn. The history itself is unchanged.
    pub fn conversation_with(&self, user: &str) -> Vec<ChatMessage> {
        let mut messages = self.messages.clone();
        messages.push(ChatMessage::user(user));
        messages
    }

    /// Content of the most recent result from tool `name`.
    pub fn last_tool_output(&self, name: &str) -> Option<&str> {
        self.messages.iter().rev().find_map(|message| match message {
            ChatMessage::Tool {
                name: tool,
                content,
                ..
            } if tool == name => Some(content.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ToolCall;
    use pretty_assertions::assert_eq;

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: "generate_patient".to_string(),
            arguments: serde_json::json!({}),
        }
    }

    #[test]
    fn test_last_tool_output_prefers_latest() {
        let mut history = ChatHistory::new();
        history.push(ChatMessage::user("patient please"));
        history.push(ChatMessage::tool_result(&call("a"), "first"));
        history.push(ChatMessage::tool_result(&call("b"), "second"));
        history.push(ChatMessage::assistant("done"));

        assert_eq!(history.last_tool_output("generate_patient"), Some("second"));
        assert_eq!(history.last_tool_output("other_tool"), None);
    }

    #[test]
    fn test_conversation_with_leaves_history_untouched() {
        let mut history = ChatHistory::new();
        history.push(ChatMessage::system("be helpful"));

        let conversation = history.conversation_with("hello");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation[1], ChatMessage::user("hello"));
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(history.is_empty());
    }
}
