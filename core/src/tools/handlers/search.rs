//! Project navigation tools: search_files and search_content.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use super::list_directory::IGNORE_DIRS;
use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::registry::ToolHandler;

/// Result cap shared by both search tools.
pub const MAX_RESULTS: usize = 50;

/// Depth-first walk over project files in sorted order, skipping the ignore
/// set. The visitor returns false to stop early.
fn walk_files(root: &Path, dir: &Path, visit: &mut dyn FnMut(&Path) -> bool) -> bool {
  let Ok(entries) = fs::read_dir(dir) else {
    return true;
  };
  let mut entries: Vec<PathBuf> = entries
    .filter_map(|entry| entry.ok().map(|e| e.path()))
    .collect();
  entries.sort();

  for path in entries {
    if path.is_dir() {
      let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
      if name.is_some_and(|name| IGNORE_DIRS.contains(&name.as_str())) {
        continue;
      }
      if !walk_files(root, &path, visit) {
        return false;
      }
    } else if !visit(&path) {
      return false;
    }
  }
  true
}

fn relative_slashed(root: &Path, path: &Path) -> String {
  path
    .strip_prefix(root)
    .unwrap_or(path)
    .to_string_lossy()
    .replace('\\', "/")
}

fn compile_glob(pattern: &str, tool: &str) -> Result<glob::Pattern, ToolError> {
  glob::Pattern::new(pattern).map_err(|e| ToolError::InvalidParameters {
    tool: tool.to_string(),
    message: format!("invalid glob pattern '{pattern}': {e}"),
  })
}

pub struct SearchFilesHandler;

#[derive(Debug, Deserialize)]
struct SearchFilesArgs {
  #[serde(default = "default_glob")]
  pattern: String,
}

fn default_glob() -> String {
  "*".to_string()
}

#[async_trait]
impl ToolHandler for SearchFilesHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: SearchFilesArgs = call.parse_params()?;
    ctx.step("search_files", &format!("pattern: {}", args.pattern));

    let pattern = compile_glob(&args.pattern, "search_files")?;
    let mut matches: Vec<String> = Vec::new();
    walk_files(&ctx.root, &ctx.root, &mut |path| {
      let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
      if name.is_some_and(|name| pattern.matches(&name)) {
        matches.push(relative_slashed(&ctx.root, path));
      }
      matches.len() < MAX_RESULTS
    });

    ctx.step("search_files", &format!("{} files found", matches.len()));

    if matches.is_empty() {
      return Ok(ToolOutput::success(format!(
        "[search_files] No files matching '{}'",
        args.pattern
      )));
    }

    let mut output = format!(
      "[search_files] {} files matching '{}':\n",
      matches.len(),
      args.pattern
    );
    output.push_str(
      &matches
        .iter()
        .map(|m| format!("  {m}"))
        .collect::<Vec<_>>()
        .join("\n"),
    );
    if matches.len() >= MAX_RESULTS {
      output.push_str("\n  ... (truncated at 50 results)");
    }
    Ok(ToolOutput::success(output))
  }
}

pub struct SearchContentHandler;

#[derive(Debug, Deserialize)]
struct SearchContentArgs {
  pattern: String,
  #[serde(default = "default_glob")]
  glob: String,
}

#[async_trait]
impl ToolHandler for SearchContentHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: SearchContentArgs = call.parse_params()?;
    if args.pattern.is_empty() {
      return Err(ToolError::Execution(
        "search_content requires a 'pattern' parameter.".to_string(),
      ));
    }

    ctx.step("search_content", &format!("'{}' in {}", args.pattern, args.glob));

    let filter = compile_glob(&args.glob, "search_content")?;
    let needle = args.pattern.to_lowercase();
    let mut matches: Vec<String> = Vec::new();

    walk_files(&ctx.root, &ctx.root, &mut |path| {
      let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
      if !name.is_some_and(|name| filter.matches(&name)) {
        return true;
      }
      let Ok(content) = fs::read_to_string(path) else {
        return true;
      };
      let rel = relative_slashed(&ctx.root, path);
      for (line_num, line) in content.lines().enumerate() {
        if line.to_lowercase().contains(&needle) {
          let clip: String = line.trim_end().chars().take(120).collect();
          matches.push(format!("  {rel}:{}: {clip}", line_num + 1));
          if matches.len() >= MAX_RESULTS {
            return false;
          }
        }
      }
      true
    });

    ctx.step("search_content", &format!("{} matches found", matches.len()));

    if matches.is_empty() {
      return Ok(ToolOutput::success(format!(
        "[search_content] No matches for '{}' in {}",
        args.pattern, args.glob
      )));
    }

    let mut output = format!(
      "[search_content] {} matches for '{}':\n",
      matches.len(),
      args.pattern
    );
    output.push_str(&matches.join("\n"));
    if matches.len() >= MAX_RESULTS {
      output.push_str("\n  ... (truncated at 50 results)");
    }
    Ok(ToolOutput::success(output))
  }
}

#[cfg(test)]
mod tests {
  use std::fs;
  use std::sync::Arc;
  use std::time::Duration;

  use serde_json::{Map, json};

  use super::*;
  use crate::reporter::NullReporter;

  fn ctx(root: &std::path::Path) -> ToolContext {
    ToolContext {
      root: root.to_path_buf(),
      command_timeout: Duration::from_secs(30),
      reporter: Arc::new(NullReporter),
    }
  }

  fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("mkdir");
    fs::create_dir_all(dir.path().join("node_modules/pkg")).expect("mkdir");
    fs::write(dir.path().join("src/main.rs"), "fn main() {\n  run();\n}\n").expect("write");
    fs::write(dir.path().join("src/lib.rs"), "pub fn run() {}\n").expect("write");
    fs::write(dir.path().join("README.md"), "Run with cargo run\n").expect("write");
    fs::write(dir.path().join("node_modules/pkg/index.js"), "run()\n").expect("write");
    dir
  }

  fn call(tool: &str, fields: &[(&str, &str)]) -> ToolCall {
    let mut params = Map::new();
    for (key, value) in fields {
      params.insert(key.to_string(), json!(value));
    }
    ToolCall::new(tool, params)
  }

  #[tokio::test]
  async fn search_files_matches_by_glob_and_skips_ignored_dirs() {
    let dir = project();
    let out = SearchFilesHandler
      .handle(call("search_files", &[("pattern", "*.rs")]), &ctx(dir.path()))
      .await
      .expect("search");

    assert!(out.content.starts_with("[search_files] 2 files matching '*.rs':"));
    assert!(out.content.contains("  src/lib.rs"));
    assert!(out.content.contains("  src/main.rs"));
    assert!(!out.content.contains("node_modules"));
  }

  #[tokio::test]
  async fn search_files_reports_no_matches() {
    let dir = project();
    let out = SearchFilesHandler
      .handle(call("search_files", &[("pattern", "*.go")]), &ctx(dir.path()))
      .await
      .expect("search");
    assert_eq!(out.content, "[search_files] No files matching '*.go'");
  }

  #[tokio::test]
  async fn search_content_is_case_insensitive_with_line_numbers() {
    let dir = project();
    let out = SearchContentHandler
      .handle(
        call("search_content", &[("pattern", "RUN"), ("glob", "*.rs")]),
        &ctx(dir.path()),
      )
      .await
      .expect("search");

    assert!(out.content.contains("src/main.rs:2:"));
    assert!(out.content.contains("src/lib.rs:1:"));
    assert!(!out.content.contains("README.md"));
  }

  #[tokio::test]
  async fn search_content_caps_results() {
    let dir = tempfile::tempdir().expect("tempdir");
    let body: String = (0..80).map(|_| "needle\n").collect();
    std::fs::write(dir.path().join("big.txt"), body).expect("write");

    let out = SearchContentHandler
      .handle(
        call("search_content", &[("pattern", "needle")]),
        &ctx(dir.path()),
      )
      .await
      .expect("search");
    assert!(out.content.starts_with("[search_content] 50 matches"));
    assert!(out.content.ends_with("... (truncated at 50 results)"));
  }
}
