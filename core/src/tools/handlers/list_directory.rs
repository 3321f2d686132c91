use std::fs;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::registry::ToolHandler;
use crate::tools::sandbox::resolve_in_root;

/// Directories never worth listing or searching.
pub const IGNORE_DIRS: &[&str] = &[
  ".git",
  "__pycache__",
  "node_modules",
  ".venv",
  "venv",
  "dist",
  "build",
  ".eggs",
  ".mypy_cache",
  ".pytest_cache",
  ".next",
  ".nuxt",
  "coverage",
  ".tox",
  "target",
  ".orangutan-config",
];

pub struct ListDirectoryHandler;

#[derive(Debug, Deserialize)]
struct ListDirectoryArgs {
  #[serde(default = "default_path")]
  path: String,
}

fn default_path() -> String {
  ".".to_string()
}

pub fn human_size(size: u64) -> String {
  let mut size = size as f64;
  for unit in ["B", "KB", "MB", "GB"] {
    if size < 1024.0 {
      return if unit == "B" {
        format!("{size:.0}{unit}")
      } else {
        format!("{size:.1}{unit}")
      };
    }
    size /= 1024.0;
  }
  format!("{size:.1}TB")
}

#[async_trait]
impl ToolHandler for ListDirectoryHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: ListDirectoryArgs = call.parse_params()?;
    let path = resolve_in_root(&ctx.root, &args.path)?;

    if !path.exists() {
      ctx.step("list_directory", &format!("{} - not found", args.path));
      return Err(ToolError::Execution(format!(
        "Directory not found: {}",
        args.path
      )));
    }
    if !path.is_dir() {
      ctx.step("list_directory", &format!("{} - not a directory", args.path));
      return Err(ToolError::Execution(format!("Not a directory: {}", args.path)));
    }

    let mut entries: Vec<_> = fs::read_dir(&path)?
      .filter_map(|entry| entry.ok())
      .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
      let name = entry.file_name().to_string_lossy().into_owned();
      if entry.path().is_dir() {
        if !IGNORE_DIRS.contains(&name.as_str()) {
          dirs.push(format!("  {name}/"));
        }
      } else {
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        files.push(format!("  {name} ({})", human_size(size)));
      }
    }

    ctx.step(
      "list_directory",
      &format!("{} ({} entries)", args.path, dirs.len() + files.len()),
    );

    let mut output = format!(
      "[Directory: {}] ({} dirs, {} files)\n",
      args.path,
      dirs.len(),
      files.len()
    );
    output.push_str(&dirs.into_iter().chain(files).collect::<Vec<_>>().join("\n"));
    Ok(ToolOutput::success(output))
  }
}
