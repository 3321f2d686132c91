//! Tool layer
//!
//! Extraction of tool calls from assistant text, the registry of executable
//! handlers, and the sandboxed execution surface they run against.

pub mod context;
pub mod extractor;
pub mod handlers;
pub mod prompt_service;
pub mod registry;
pub mod sandbox;
pub mod spec;

pub use context::{ToolCall, ToolContext, ToolError, ToolOutput};
pub use extractor::extract_tool_calls;
pub use handlers::default_registry;
pub use prompt_service::{PromptAnswer, PromptService};
pub use registry::{ToolHandler, ToolRegistry};
pub use spec::{JsonSchema, ToolSpec, build_specs};
