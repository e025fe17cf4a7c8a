//! Enabled tools and call resolution.

use chainlab_llm::{ToolCall, ToolDefinition};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::tool::ToolKind;

/// A model tool call matched to a known tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub call_id: String,
    pub kind: ToolKind,
    pub arguments: Value,
}

/// The tools offered to a model in one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRegistry {
    tools: Vec<ToolKind>,
}

impl ToolRegistry {
    pub fn new(tools: impl IntoIterator<Item = ToolKind>) -> Self {
        let mut registry = Self::default();
        for kind in tools {
            registry.register(kind);
        }
        registry
    }

    /// Enable a tool. Registering twice is a no-op.
    pub fn register(&mut self, kind: ToolKind) {
        if !self.tools.contains(&kind) {
            self.tools.push(kind);
        }
    }

    pub fn contains(&self, kind: ToolKind) -> bool {
        self.tools.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions to attach to a chat request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|kind| kind.definition()).collect()
    }

    /// Match a call to an enabled tool.
    pub fn resolve(&self, call: &ToolCall) -> Result<ToolInvocation> {
        let kind = ToolKind::from_name(&call.name)
            .filter(|kind| self.contains(*kind))
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;

        debug!("Resolved tool call {} to {}", call.id, kind);
        Ok(ToolInvocation {
            call_id: call.id.clone(),
            kind,
            arguments: call.arguments.clone(),
        })
    }
}
