use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::reporter::StepReporter;

/// A parsed invocation extracted from assistant output. Transient: created
/// per loop round by the extractor, consumed immediately by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
  pub name: String,
  pub params: Map<String, Value>,
}

impl ToolCall {
  pub fn new(name: impl Into<String>, params: Map<String, Value>) -> Self {
    Self {
      name: name.into(),
      params,
    }
  }

  /// Deserialize the parameter mapping into a typed argument struct.
  pub fn parse_params<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(self.params.clone())).map_err(|e| {
      ToolError::InvalidParameters {
        tool: self.name.clone(),
        message: e.to_string(),
      }
    })
  }
}

/// Outcome of executing one tool call. `content` is the text fed back to the
/// model; the short per-call status line goes through the step reporter.
#[derive(Debug, Clone)]
pub struct ToolOutput {
  pub content: String,
  pub is_error: bool,
}

impl ToolOutput {
  pub fn success(content: impl Into<String>) -> Self {
    Self {
      content: content.into(),
      is_error: false,
    }
  }

  pub fn error(content: impl Into<String>) -> Self {
    Self {
      content: content.into(),
      is_error: true,
    }
  }
}

/// Shared tool runtime context for one session.
#[derive(Clone)]
pub struct ToolContext {
  /// Canonicalized project root; all filesystem paths must resolve inside it.
  pub root: PathBuf,
  /// Wall-clock budget for run_command.
  pub command_timeout: Duration,
  pub reporter: Arc<dyn StepReporter>,
}

impl ToolContext {
  pub fn step(&self, tool: &str, detail: &str) {
    self.reporter.step(tool, detail);
  }
}

fn match_message(path: &str, count: usize) -> String {
  if count == 0 {
    format!("String not found in {path}")
  } else {
    format!("String found {count} times in {path}. Provide more context to make it unique.")
  }
}

/// Tool invocation failures. All variants are recovered locally: the
/// executor folds them into an error tool result fed back to the model.
#[derive(Error, Debug)]
pub enum ToolError {
  #[error("Unknown tool: {0}")]
  UnknownTool(String),

  #[error("Invalid parameters for {tool}: {message}")]
  InvalidParameters { tool: String, message: String },

  #[error("Path '{0}' escapes the project directory.")]
  PathEscape(String),

  #[error("{}", match_message(path, *count))]
  AmbiguousOrMissingMatch { path: String, count: usize },

  #[error("Command timed out after {0} seconds.")]
  Timeout(u64),

  #[error("{0}")]
  Execution(String),

  #[error("{0}")]
  Io(#[from] std::io::Error),
}
