//! Tool-call extractor
//!
//! Scans one completed assistant turn for `<tool>{json}</tool>` spans and
//! parses each payload into a [`ToolCall`]. Extraction is tolerant: a span
//! whose payload is not valid JSON, or that lacks the tool name, yields no
//! call and does not affect later spans. Text outside marker spans is never
//! consumed; the full assistant text stays the canonical conversation record.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::context::ToolCall;

pub const TOOL_OPEN: &str = "<tool>";
pub const TOOL_CLOSE: &str = "</tool>";

/// One delimited marker span found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Span<'a> {
  /// Byte offset of the start marker, for ordering and diagnostics.
  start: usize,
  payload: &'a str,
}

/// Marker scanner over the assistant text. Yields spans in textual order;
/// an unclosed start marker ends the scan without producing a span.
struct Scanner<'a> {
  text: &'a str,
  pos: usize,
}

impl<'a> Scanner<'a> {
  fn new(text: &'a str) -> Self {
    Self { text, pos: 0 }
  }
}

impl<'a> Iterator for Scanner<'a> {
  type Item = Span<'a>;

  fn next(&mut self) -> Option<Span<'a>> {
    let rest = &self.text[self.pos..];
    let open = rest.find(TOOL_OPEN)?;
    let payload_start = self.pos + open + TOOL_OPEN.len();

    let close = self.text[payload_start..].find(TOOL_CLOSE)?;
    let payload_end = payload_start + close;

    let span = Span {
      start: self.pos + open,
      payload: self.text[payload_start..payload_end].trim(),
    };
    self.pos = payload_end + TOOL_CLOSE.len();
    Some(span)
  }
}

/// Structured payload inside one marker span.
#[derive(Debug, Deserialize)]
struct CallPayload {
  tool: Option<String>,
  #[serde(default)]
  params: Map<String, Value>,
}

fn parse_span(span: &Span<'_>) -> Option<ToolCall> {
  let payload: CallPayload = match serde_json::from_str(span.payload) {
    Ok(payload) => payload,
    Err(e) => {
      debug!("skipping malformed tool span at byte {}: {e}", span.start);
      return None;
    }
  };

  let name = payload.tool?;
  Some(ToolCall::new(name, payload.params))
}

/// Extract all well-formed tool calls from one assistant turn, in stable
/// first-to-last textual order. Tool existence and parameter shape are not
/// validated here; that is the registry's job.
pub fn extract_tool_calls(text: &str) -> Vec<ToolCall> {
  Scanner::new(text)
    .filter_map(|span| parse_span(&span))
    .collect()
}
