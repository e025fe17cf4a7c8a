//! Tool execution.
//!
//! The `ToolExecutor` checks the call arguments, runs the tool and captures
//! the output with timing.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::registry::ToolInvocation;
use crate::tool::{ToolKind, generate_patient};

/// Output of a tool run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Tool name.
    pub tool: String,

    /// JSON output.
    pub output: Value,

    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionResult {
    /// Output as the text recorded in a tool message.
    pub fn content(&self) -> String {
        self.output.to_string()
    }
}

/// Executor for running tools.
#[derive(Debug, Default)]
pub struct ToolExecutor;

impl ToolExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a resolved tool call.
    pub async fn execute(&self, invocation: &ToolInvocation) -> Result<ExecutionResult> {
        let start = Instant::now();
        let kind = invocation.kind;

        debug!(
            "Executing tool: {} with inputs: {}",
            kind, invocation.arguments
        );

        kind.check_arguments(&invocation.arguments)?;

        let result = self.run(kind);
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                info!("Tool {} executed successfully in {}ms", kind, duration_ms);
                Ok(ExecutionResult {
                    tool: kind.name().to_string(),
                    output,
                    duration_ms,
                })
            }
            Err(e) => {
                warn!("Tool {} failed: {}", kind, e);
                Err(e)
            }
        }
    }

    fn run(&self, kind: ToolKind) -> Result<Value> {
        match kind {
            ToolKind::GeneratePatient => Ok(serde_json::to_value(generate_patient())?),
        }
    }
}
