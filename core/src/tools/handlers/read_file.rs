use std::fs;
use std::io;

use async_trait::async_trait;
use serde::Deserialize;

use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::registry::ToolHandler;
use crate::tools::sandbox::resolve_in_root;

/// Window size for one read; larger files are paged with `offset`.
pub const MAX_READ_LINES: usize = 200;

pub struct ReadFileHandler;

#[derive(Debug, Deserialize)]
struct ReadFileArgs {
  path: String,
  #[serde(default)]
  offset: usize,
}

#[async_trait]
impl ToolHandler for ReadFileHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: ReadFileArgs = call.parse_params()?;
    let path = resolve_in_root(&ctx.root, &args.path)?;

    if !path.exists() {
      ctx.step("read_file", &format!("{} - not found", args.path));
      return Err(ToolError::Execution(format!("File not found: {}", args.path)));
    }
    if !path.is_file() {
      return Err(ToolError::Execution(format!("Not a file: {}", args.path)));
    }

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      // Lossy fallback covers non-UTF-8 content only; real read failures
      // surface as errors.
      Err(e) if e.kind() == io::ErrorKind::InvalidData => {
        String::from_utf8_lossy(&fs::read(&path)?).into_owned()
      }
      Err(e) => return Err(ToolError::Io(e)),
    };

    let all_lines: Vec<&str> = content.lines().collect();
    let total = all_lines.len();
    let start = args.offset.min(total);
    let end = (start + MAX_READ_LINES).min(total);
    let shown = end - start;
    let chunk = all_lines[start..end].join("\n");

    let range_info = format!("lines {}-{} of {}", start + 1, start + shown, total);
    ctx.step("read_file", &format!("{} ({range_info})", args.path));

    let mut header = format!("[Read {}] ({range_info})", args.path);
    if total > start + MAX_READ_LINES {
      header.push_str(&format!(
        "\n[WARNING: File has {total} lines. Showing first {MAX_READ_LINES} from offset {start}. \
         Use offset parameter to read more: {{\"offset\": {end}}}]"
      ));
    }

    Ok(ToolOutput::success(format!("{header}\n{chunk}")))
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

  fn call(path: &str, offset: Option<usize>) -> ToolCall {
    let mut params = Map::new();
    params.insert("path".to_string(), json!(path));
    if let Some(offset) = offset {
      params.insert("offset".to_string(), json!(offset));
    }
    ToolCall::new("read_file", params)
  }

  #[tokio::test]
  async fn reads_file_with_range_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("a.txt"), "one\ntwo\nthree\n").expect("write");

    let out = ReadFileHandler
      .handle(call("a.txt", None), &ctx(dir.path()))
      .await
      .expect("read");

    assert_eq!(out.content, "[Read a.txt] (lines 1-3 of 3)\none\ntwo\nthree");
  }

  #[tokio::test]
  async fn offset_pages_through_long_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let body: String = (0..250).map(|i| format!("line{i}\n")).collect();
    fs::write(dir.path().join("big.txt"), body).expect("write");

    let out = ReadFileHandler
      .handle(call("big.txt", None), &ctx(dir.path()))
      .await
      .expect("read");
    assert!(out.content.contains("[WARNING: File has 250 lines."));
    assert!(out.content.contains("{\"offset\": 200}"));

    let out = ReadFileHandler
      .handle(call("big.txt", Some(200)), &ctx(dir.path()))
      .await
      .expect("read");
    assert!(out.content.starts_with("[Read big.txt] (lines 201-250 of 250)"));
    assert!(out.content.contains("line249"));
  }

  #[tokio::test]
  async fn missing_file_is_a_recoverable_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ReadFileHandler
      .handle(call("nope.txt", None), &ctx(dir.path()))
      .await
      .expect_err("must fail");
    assert_eq!(err.to_string(), "File not found: nope.txt");
  }

  #[tokio::test]
  async fn non_utf8_content_is_read_lossily() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("bin.dat"), [0x66, 0x6f, 0xff, 0x6f]).expect("write");

    let out = ReadFileHandler
      .handle(call("bin.dat", None), &ctx(dir.path()))
      .await
      .expect("read");
    assert!(out.content.contains("fo\u{FFFD}o"));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn unreadable_file_surfaces_an_io_error() {
    use std::os::unix::fs::PermissionsExt;

    // Permission bits do not apply to root.
    if unsafe { libc::geteuid() } == 0 {
      return;
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("locked.txt");
    fs::write(&path, "secret\n").expect("write");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).expect("chmod");

    let err = ReadFileHandler
      .handle(call("locked.txt", None), &ctx(dir.path()))
      .await
      .expect_err("must fail");
    assert!(matches!(err, ToolError::Io(_)));
  }

  #[tokio::test]
  async fn escaping_path_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ReadFileHandler
      .handle(call("../../etc/passwd", None), &ctx(dir.path()))
      .await
      .expect_err("must fail");
    assert!(matches!(err, ToolError::PathEscape(_)));
  }
}
