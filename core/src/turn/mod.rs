//! Agentic loop controller
//!
//! Drives one user turn: send the conversation to the model, extract tool
//! calls from the completed reply, execute them in textual order, append the
//! results, and repeat until a reply carries no calls or the round cap is
//! reached. Strictly sequential: one model request or one tool call is in
//! flight at any time, so the history stays ordered and replayable.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::model::{ModelError, ModelService, TokenSink};
use crate::session::ConversationState;
use crate::tools::{ToolContext, ToolRegistry, extract_tool_calls};

/// How one user turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
  /// The model produced a reply with no tool calls; this is the answer.
  Completed { text: String },
  /// The round cap was hit while the model was still issuing calls. The last
  /// assistant text is returned so callers can surface the distinction.
  RoundLimit { text: String },
  /// The stream was cancelled mid-turn. The partial text is surfaced to the
  /// caller but was NOT committed to the conversation.
  Cancelled { partial: String },
}

/// Loop-level failures. Per-call tool errors never surface here; they are
/// recovered into tool results inside the round.
#[derive(Error, Debug)]
pub enum TurnError {
  #[error(transparent)]
  Model(#[from] ModelError),
}

/// Run the tool-call loop for the most recent user message in `state`.
///
/// Every round appends exactly one assistant message; each tool call's result
/// is appended as its own tool_result message before the next call executes.
/// A fresh call resets the round counter.
pub async fn run_turn(
  model: &dyn ModelService,
  state: &mut ConversationState,
  registry: &ToolRegistry,
  ctx: &ToolContext,
  max_rounds: u32,
  sink: &mut dyn TokenSink,
  cancel: &CancellationToken,
) -> Result<TurnOutcome, TurnError> {
  let mut rounds = 0u32;

  loop {
    let outcome = model.send(state.messages(), sink, cancel).await?;
    if outcome.cancelled {
      info!("turn cancelled during round {}", rounds + 1);
      return Ok(TurnOutcome::Cancelled {
        partial: outcome.text,
      });
    }

    // The full assistant text, prose and call markers included, is the
    // canonical record.
    state.push_assistant(outcome.text.clone());
    rounds += 1;

    let calls = extract_tool_calls(&outcome.text);
    if calls.is_empty() {
      debug!("turn completed after {rounds} round(s)");
      return Ok(TurnOutcome::Completed { text: outcome.text });
    }

    debug!("round {rounds}: executing {} tool call(s)", calls.len());
    for call in calls {
      let name = call.name.clone();
      let result = registry.execute(call, ctx).await;
      state.push_tool_result(format!("Tool result for {name}:\n{}", result.content));
    }

    if rounds >= max_rounds {
      info!("round limit ({max_rounds}) reached, stopping turn");
      return Ok(TurnOutcome::RoundLimit { text: outcome.text });
    }
  }
}
