use std::fs;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::registry::ToolHandler;
use crate::tools::sandbox::resolve_in_root;

pub struct WriteFileHandler;

#[derive(Debug, Deserialize)]
struct WriteFileArgs {
  path: String,
  content: String,
}

#[async_trait]
impl ToolHandler for WriteFileHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: WriteFileArgs = call.parse_params()?;
    let path = resolve_in_root(&ctx.root, &args.path)?;

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&path, &args.content)?;

    let line_count = args.content.matches('\n').count() + 1;
    ctx.step(
      "write_file",
      &format!("{} ({line_count} lines written)", args.path),
    );
    Ok(ToolOutput::success(format!(
      "[Wrote {}] ({line_count} lines)",
      args.path
    )))
  }
}
