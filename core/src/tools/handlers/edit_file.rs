use std::fs;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::registry::ToolHandler;
use crate::tools::sandbox::resolve_in_root;

pub struct EditFileHandler;

#[derive(Debug, Deserialize)]
struct EditFileArgs {
  path: String,
  old_string: String,
  new_string: String,
}

#[async_trait]
impl ToolHandler for EditFileHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: EditFileArgs = call.parse_params()?;
    let path = resolve_in_root(&ctx.root, &args.path)?;

    if !path.exists() {
      ctx.step("edit_file", &format!("{} - not found", args.path));
      return Err(ToolError::Execution(format!("File not found: {}", args.path)));
    }

    let content = fs::read_to_string(&path)?;

    // Exact-string uniqueness check, no regex.
    let count = content.matches(&args.old_string).count();
    if count == 0 {
      ctx.step("edit_file", &format!("{} - string not found", args.path));
      return Err(ToolError::AmbiguousOrMissingMatch {
        path: args.path,
        count,
      });
    }
    if count > 1 {
      ctx.step(
        "edit_file",
        &format!("{} - {count} matches (ambiguous)", args.path),
      );
      return Err(ToolError::AmbiguousOrMissingMatch {
        path: args.path,
        count,
      });
    }

    let new_content = content.replacen(&args.old_string, &args.new_string, 1);
    fs::write(&path, new_content)?;

    ctx.step("edit_file", &format!("{} (1 replacement)", args.path));
    Ok(ToolOutput::success(format!(
      "[Edited {}] Replaced 1 occurrence.",
      args.path
    )))
  }
}
