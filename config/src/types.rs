// Configuration Types

use serde::{Deserialize, Serialize};

/// Runtime configuration, constructed once at startup and passed by
/// reference into the model adapter and turn loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
  /// Model identifier served by Ollama
  pub model: String,
  /// Ollama base URL
  pub base_url: String,
  /// Keep-warm hint passed with every chat request
  pub keep_alive: String,
  /// Maximum tool rounds per user turn
  pub max_tool_rounds: u32,
  /// Wall-clock budget for run_command, in seconds
  pub command_timeout_secs: u64,
  /// Sampling settings
  pub sampling: SamplingConfig,
}

/// Sampling settings forwarded opaquely to the model backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
  pub temperature: f32,
  pub top_p: f32,
  pub top_k: u32,
  /// Context window size in tokens
  pub num_ctx: u32,
  /// Response length limit (-1 = unlimited)
  pub num_predict: i32,
  pub repeat_penalty: f32,
  /// Custom stop sequences
  pub stop: Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      model: "qwen2.5-coder:7b-instruct".to_string(),
      base_url: "http://localhost:11434".to_string(),
      keep_alive: "10m".to_string(),
      max_tool_rounds: 10,
      command_timeout_secs: 30,
      sampling: SamplingConfig::default(),
    }
  }
}

impl Default for SamplingConfig {
  fn default() -> Self {
    Self {
      temperature: 0.4,
      top_p: 0.9,
      top_k: 40,
      num_ctx: 8192,
      num_predict: -1,
      repeat_penalty: 1.1,
      stop: vec!["[END]".to_string()],
    }
  }
}
