//! Model layer types
//!
//! Conversation messages and the generation options forwarded to Ollama.

use serde::{Deserialize, Serialize};

use orangutan_config::Config;

/// Role of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  System,
  User,
  Assistant,
  ToolResult,
}

/// One turn in a conversation. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  pub role: Role,
  pub content: String,
}

impl Message {
  pub fn system(content: impl Into<String>) -> Self {
    Self {
      role: Role::System,
      content: content.into(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self {
      role: Role::User,
      content: content.into(),
    }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self {
      role: Role::Assistant,
      content: content.into(),
    }
  }

  pub fn tool_result(content: impl Into<String>) -> Self {
    Self {
      role: Role::ToolResult,
      content: content.into(),
    }
  }
}

/// Generation options sent with every chat request. Constructed once from
/// [`Config`] at startup; no hidden mutable option state.
#[derive(Debug, Clone, Serialize)]
pub struct ModelOptions {
  pub temperature: f32,
  pub top_p: f32,
  pub top_k: u32,
  pub num_ctx: u32,
  pub num_predict: i32,
  pub repeat_penalty: f32,
  pub stop: Vec<String>,
}

impl From<&Config> for ModelOptions {
  fn from(config: &Config) -> Self {
    let sampling = &config.sampling;
    Self {
      temperature: sampling.temperature,
      top_p: sampling.top_p,
      top_k: sampling.top_k,
      num_ctx: sampling.num_ctx,
      num_predict: sampling.num_predict,
      repeat_penalty: sampling.repeat_penalty,
      stop: sampling.stop.clone(),
    }
  }
}

/// Result of one chat call. `cancelled` marks a stream that was interrupted
/// before end-of-turn; `text` then holds whatever partial output arrived.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
  pub text: String,
  pub cancelled: bool,
}
