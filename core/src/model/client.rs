//! Ollama chat client
//!
//! Streaming chat over the local Ollama HTTP API (`POST /api/chat`, NDJSON).

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use orangutan_config::Config;

use super::error::{ModelError, Result};
use super::types::{ChatOutcome, Message, ModelOptions, Role};

/// Receiver for incrementally streamed tokens. Purely observational.
pub trait TokenSink: Send {
  fn on_token(&mut self, token: &str);

  /// Called once per request, before the first token arrives. Display sinks
  /// use it to show a waiting indicator that the first token clears.
  fn on_wait(&mut self) {}
}

/// Sink that discards tokens.
pub struct NullSink;

impl TokenSink for NullSink {
  fn on_token(&mut self, _token: &str) {}
}

/// Chat-completion service consumed by the turn loop.
///
/// One call streams a finite sequence of text fragments and resolves to the
/// aggregate text plus whether the stream ran to end-of-turn or was cancelled.
#[async_trait]
pub trait ModelService: Send + Sync {
  async fn send(
    &self,
    messages: &[Message],
    sink: &mut dyn TokenSink,
    cancel: &CancellationToken,
  ) -> Result<ChatOutcome>;
}

/// Ollama client (local models).
pub struct OllamaClient {
  client: Client,
  base_url: String,
  model: String,
  keep_alive: String,
  options: ModelOptions,
}

#[derive(serde::Serialize)]
struct OllamaRequest<'a> {
  model: &'a str,
  messages: Vec<WireMessage<'a>>,
  stream: bool,
  options: &'a ModelOptions,
  keep_alive: &'a str,
}

#[derive(serde::Serialize)]
struct WireMessage<'a> {
  role: &'static str,
  content: &'a str,
}

#[derive(Deserialize)]
struct StreamLine {
  #[serde(default)]
  message: Option<StreamMessage>,
  #[serde(default)]
  done: bool,
  #[serde(default)]
  error: Option<String>,
}

#[derive(Deserialize)]
struct StreamMessage {
  #[serde(default)]
  content: String,
}

impl OllamaClient {
  pub fn new(config: &Config) -> Self {
    Self {
      client: Client::new(),
      base_url: config.base_url.trim_end_matches('/').to_string(),
      model: config.model.clone(),
      keep_alive: config.keep_alive.clone(),
      options: ModelOptions::from(config),
    }
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/api/{}", self.base_url, path)
  }

  fn wire_messages<'a>(messages: &'a [Message]) -> Vec<WireMessage<'a>> {
    messages
      .iter()
      .map(|m| WireMessage {
        role: match m.role {
          Role::System => "system",
          Role::User => "user",
          Role::Assistant => "assistant",
          // Tool results go back as user turns; the local chat API has no
          // first-class tool role for marker-embedded calls.
          Role::ToolResult => "user",
        },
        content: &m.content,
      })
      .collect()
  }
}

#[async_trait]
impl ModelService for OllamaClient {
  async fn send(
    &self,
    messages: &[Message],
    sink: &mut dyn TokenSink,
    cancel: &CancellationToken,
  ) -> Result<ChatOutcome> {
    let request = OllamaRequest {
      model: &self.model,
      messages: Self::wire_messages(messages),
      stream: true,
      options: &self.options,
      keep_alive: &self.keep_alive,
    };

    sink.on_wait();

    let response = self
      .client
      .post(self.endpoint("chat"))
      .json(&request)
      .send()
      .await
      .map_err(ModelError::NetworkError)?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(ModelError::ApiError(format!("HTTP {status}: {body}")));
    }

    let mut stream = response.bytes_stream();
    let mut buffer = String::new();
    let mut full_text = String::new();

    loop {
      let chunk = tokio::select! {
        _ = cancel.cancelled() => {
          debug!("chat stream cancelled after {} chars", full_text.len());
          return Ok(ChatOutcome { text: full_text, cancelled: true });
        }
        chunk = stream.next() => chunk,
      };

      let Some(chunk) = chunk else {
        break;
      };
      let bytes = chunk.map_err(ModelError::NetworkError)?;
      buffer.push_str(&String::from_utf8_lossy(&bytes));

      // One JSON object per line.
      while let Some(idx) = buffer.find('\n') {
        let line: String = buffer.drain(..=idx).collect();
        let line = line.trim();
        if line.is_empty() {
          continue;
        }

        let parsed: StreamLine = serde_json::from_str(line)
          .map_err(|e| ModelError::StreamError(format!("bad stream line: {e}")))?;

        if let Some(error) = parsed.error {
          return Err(ModelError::ApiError(error));
        }
        if let Some(message) = parsed.message
          && !message.content.is_empty()
        {
          sink.on_token(&message.content);
          full_text.push_str(&message.content);
        }
        if parsed.done {
          return Ok(ChatOutcome {
            text: full_text,
            cancelled: false,
          });
        }
      }
    }

    // Stream ended without a done marker; treat what arrived as the turn.
    debug!("chat stream closed without done marker");
    Ok(ChatOutcome {
      text: full_text,
      cancelled: false,
    })
  }
}
