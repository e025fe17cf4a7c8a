//! # Tools
//!
//! The closed set of functions a chat model may call.
//!
//! ```text
//! ToolCall ──► ToolRegistry::resolve ──► ToolInvocation ──► ToolExecutor ──► ExecutionResult
//!                    │
//!                    └── definitions() ──► ChatRequest::with_tools
//! ```

pub mod error;
pub mod executor;
pub mod registry;
pub mod tool;

pub use error::{Result, ToolError};
pub use executor::{ExecutionResult, ToolExecutor};
pub use registry::{ToolInvocation, ToolRegistry};
pub use tool::{PatientRecord, ToolKind, generate_patient};
