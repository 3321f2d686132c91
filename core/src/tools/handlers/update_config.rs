use async_trait::async_trait;
use serde::Deserialize;

use orangutan_config::{read_project_file, update_section, write_project_file};

use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::registry::ToolHandler;

pub struct UpdateConfigHandler;

#[derive(Debug, Deserialize)]
struct UpdateConfigArgs {
  section: String,
  content: String,
}

#[async_trait]
impl ToolHandler for UpdateConfigHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: UpdateConfigArgs = call.parse_params()?;
    if args.section.is_empty() || args.content.is_empty() {
      return Err(ToolError::Execution(
        "update_config requires 'section' and 'content' parameters.".to_string(),
      ));
    }

    let current = read_project_file(&ctx.root);
    if current.is_empty() {
      return Err(ToolError::Execution(
        "No orangutan.md found. Cannot update.".to_string(),
      ));
    }

    let updated = update_section(&current, &args.section, &args.content);
    write_project_file(&ctx.root, &updated)?;

    ctx.step(
      "update_config",
      &format!("section '{}' updated in orangutan.md", args.section),
    );
    Ok(ToolOutput::success(format!(
      "[Updated orangutan.md] Section '{}' updated.",
      args.section
    )))
  }
}
