use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use super::spec::ToolSpec;

/// Executable tool. One call fully completes (success, domain error, or
/// timeout) before its result is appended and before the next call begins.
#[async_trait]
pub trait ToolHandler: Send + Sync {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError>;
}

/// Maps tool names to handlers and their declared parameter contracts.
/// Immutable after startup.
#[derive(Default)]
pub struct ToolRegistry {
  handlers: HashMap<String, Arc<dyn ToolHandler>>,
  specs: Vec<ToolSpec>,
}

impl ToolRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register_tool(&mut self, spec: ToolSpec, handler: Arc<dyn ToolHandler>) {
    self.handlers.insert(spec.name.clone(), handler);
    self.specs.push(spec);
  }

  pub fn get_spec(&self, name: &str) -> Option<&ToolSpec> {
    self.specs.iter().find(|spec| spec.name == name)
  }

  /// Specs in registration order, for the system prompt tool list.
  pub fn list_specs(&self) -> &[ToolSpec] {
    &self.specs
  }

  /// Validate and dispatch one call.
  pub async fn dispatch(
    &self,
    call: ToolCall,
    ctx: &ToolContext,
  ) -> Result<ToolOutput, ToolError> {
    let handler = self
      .handlers
      .get(&call.name)
      .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

    if let Some(spec) = self.get_spec(&call.name) {
      let missing: Vec<&String> = spec
        .required_params()
        .iter()
        .filter(|param| !call.params.contains_key(*param))
        .collect();
      if let Some(first) = missing.first() {
        return Err(ToolError::InvalidParameters {
          tool: call.name.clone(),
          message: format!("missing required parameter '{first}'"),
        });
      }
    }

    handler.handle(call, ctx).await
  }

  /// Execute one call, recovering every failure into an error tool result so
  /// no per-call error can abort the loop.
  pub async fn execute(&self, call: ToolCall, ctx: &ToolContext) -> ToolOutput {
    let name = call.name.clone();
    match self.dispatch(call, ctx).await {
      Ok(output) => output,
      Err(e) => {
        debug!("tool {name} failed: {e}");
        ToolOutput::error(format!("[Error] {e}"))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use pretty_assertions::assert_eq;
  use serde_json::{Map, json};

  use super::*;
  use crate::reporter::NullReporter;
  use crate::tools::spec::JsonSchema;

  struct EchoHandler;

  #[async_trait]
  impl ToolHandler for EchoHandler {
    async fn handle(&self, call: ToolCall, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
      Ok(ToolOutput::success(format!("echo {}", call.params["text"])))
    }
  }

  fn echo_spec() -> ToolSpec {
    let mut props = BTreeMap::new();
    props.insert("text".to_string(), JsonSchema::String { description: None });
    ToolSpec::new(
      "echo",
      "Echo text",
      JsonSchema::Object {
        properties: props,
        required: Some(vec!["text".to_string()]),
      },
    )
  }

  fn test_ctx() -> ToolContext {
    ToolContext {
      root: std::env::temp_dir(),
      command_timeout: std::time::Duration::from_secs(30),
      reporter: Arc::new(NullReporter),
    }
  }

  #[tokio::test]
  async fn dispatches_registered_tool() {
    let mut registry = ToolRegistry::new();
    registry.register_tool(echo_spec(), Arc::new(EchoHandler));

    let mut params = Map::new();
    params.insert("text".to_string(), json!("hi"));
    let out = registry
      .execute(ToolCall::new("echo", params), &test_ctx())
      .await;

    assert!(!out.is_error);
    assert_eq!(out.content, "echo \"hi\"");
  }

  #[tokio::test]
  async fn unknown_tool_becomes_error_result() {
    let registry = ToolRegistry::new();
    let out = registry
      .execute(ToolCall::new("nope", Map::new()), &test_ctx())
      .await;

    assert!(out.is_error);
    assert_eq!(out.content, "[Error] Unknown tool: nope");
  }

  #[tokio::test]
  async fn missing_required_parameter_is_rejected_before_the_handler() {
    let mut registry = ToolRegistry::new();
    registry.register_tool(echo_spec(), Arc::new(EchoHandler));

    let out = registry
      .execute(ToolCall::new("echo", Map::new()), &test_ctx())
      .await;

    assert!(out.is_error);
    assert!(out.content.contains("missing required parameter 'text'"));
  }
}
