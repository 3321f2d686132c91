use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::prompt_service::{PromptAnswer, PromptService};
use crate::tools::registry::ToolHandler;

/// Affordance appended after the model's options so the developer can always
/// type a custom answer.
pub const CUSTOM_ANSWER_OPTION: &str = "Other (type custom answer)";

pub const CANCELLED_RESULT: &str = "[User cancelled the prompt]";

pub struct AskUserHandler {
  prompt: Arc<dyn PromptService>,
}

impl AskUserHandler {
  pub fn new(prompt: Arc<dyn PromptService>) -> Self {
    Self { prompt }
  }

  fn answer_text(answer: PromptAnswer) -> Option<String> {
    match answer {
      PromptAnswer::Selected(text) | PromptAnswer::Text(text) => {
        Some(format!("[User answer] {text}"))
      }
      PromptAnswer::Cancelled => None,
    }
  }
}

#[derive(Debug, Deserialize)]
struct AskUserArgs {
  question: String,
  #[serde(default)]
  options: Vec<String>,
}

#[async_trait]
impl ToolHandler for AskUserHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: AskUserArgs = call.parse_params()?;
    if args.question.is_empty() {
      return Err(ToolError::InvalidParameters {
        tool: "ask_user".to_string(),
        message: "requires a non-empty 'question' parameter".to_string(),
      });
    }

    ctx.step("ask_user", "waiting for developer input...");

    let answer = if args.options.is_empty() {
      self.prompt.input(&args.question)
    } else {
      let mut choices = args.options.clone();
      choices.push(CUSTOM_ANSWER_OPTION.to_string());
      match self.prompt.select(&args.question, &choices) {
        PromptAnswer::Selected(choice) if choice == CUSTOM_ANSWER_OPTION => {
          self.prompt.input("Your answer:")
        }
        other => other,
      }
    };

    // Cancellation is a textual result the model can react to, not an error.
    let result = Self::answer_text(answer).unwrap_or_else(|| CANCELLED_RESULT.to_string());
    ctx.step("ask_user", &result);
    Ok(ToolOutput::success(result))
  }
}
