use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::tools::context::{ToolCall, ToolContext, ToolError, ToolOutput};
use crate::tools::registry::ToolHandler;

pub struct RunCommandHandler;

#[derive(Debug, Deserialize)]
struct RunCommandArgs {
  command: String,
}

#[async_trait]
impl ToolHandler for RunCommandHandler {
  async fn handle(&self, call: ToolCall, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
    let args: RunCommandArgs = call.parse_params()?;
    ctx.step("run_command", &args.command);

    let mut cmd = Command::new("bash");
    cmd
      .arg("-c")
      .arg(&args.command)
      .current_dir(&ctx.root)
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);
    // Own process group, so a timeout can take the whole tree down.
    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd
      .spawn()
      .map_err(|e| ToolError::Execution(format!("command failed to start: {e}")))?;
    #[cfg(unix)]
    let pgid = child.id();

    let timeout_secs = ctx.command_timeout.as_secs();
    let output = match tokio::time::timeout(ctx.command_timeout, child.wait_with_output()).await {
      Ok(result) => result.map_err(|e| ToolError::Execution(format!("command failed: {e}")))?,
      Err(_) => {
        // The dropped wait future kills the direct child (kill_on_drop);
        // the rest of the group goes with it.
        #[cfg(unix)]
        if let Some(pgid) = pgid {
          unsafe {
            libc::killpg(pgid as libc::pid_t, libc::SIGKILL);
          }
        }
        ctx.step("run_command", &format!("timed out ({timeout_secs}s)"));
        return Err(ToolError::Timeout(timeout_secs));
      }
    };

    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    if combined.trim().is_empty() {
      combined = "(no output)".to_string();
    }

    let exit_code = output.status.code().unwrap_or(-1);
    let status = if exit_code == 0 {
      "ok".to_string()
    } else {
      format!("exit {exit_code}")
    };
    ctx.step("run_command", &format!("completed ({status})"));
    debug!("run_command finished: {status}");

    Ok(ToolOutput {
      content: format!("[Exit code: {exit_code}]\n{}", combined.trim()),
      is_error: exit_code != 0,
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;
  use std::time::{Duration, Instant};

  use pretty_assertions::assert_eq;
  use serde_json::{Map, json};

  use super::*;
  use crate::reporter::NullReporter;

  fn ctx(root: &std::path::Path, timeout: Duration) -> ToolContext {
    ToolContext {
      root: root.to_path_buf(),
      command_timeout: timeout,
      reporter: Arc::new(NullReporter),
    }
  }

  fn call(command: &str) -> ToolCall {
    let mut params = Map::new();
    params.insert("command".to_string(), json!(command));
    ToolCall::new("run_command", params)
  }

  #[tokio::test]
  async fn captures_output_and_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = RunCommandHandler
      .handle(call("echo hello"), &ctx(dir.path(), Duration::from_secs(30)))
      .await
      .expect("run");

    assert!(!out.is_error);
    assert!(out.content.starts_with("[Exit code: 0]\n"));
    assert!(out.content.ends_with("hello"));
  }

  #[tokio::test]
  async fn nonzero_exit_is_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = RunCommandHandler
      .handle(call("exit 3"), &ctx(dir.path(), Duration::from_secs(30)))
      .await
      .expect("run");

    assert!(out.is_error);
    assert!(out.content.starts_with("[Exit code: 3]"));
  }

  #[tokio::test]
  async fn empty_output_is_marked() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = RunCommandHandler
      .handle(call("true"), &ctx(dir.path(), Duration::from_secs(30)))
      .await
      .expect("run");

    assert!(out.content.starts_with("[Exit code: 0]"));
    assert!(out.content.ends_with("(no output)"));
  }

  #[tokio::test]
  async fn runs_in_the_project_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("marker.txt"), "x").expect("write");

    let out = RunCommandHandler
      .handle(call("ls"), &ctx(dir.path(), Duration::from_secs(30)))
      .await
      .expect("run");
    assert!(out.content.contains("marker.txt"));
  }

  #[tokio::test]
  async fn long_command_times_out_and_process_is_gone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let started = Instant::now();

    let err = RunCommandHandler
      .handle(
        call("sleep 30"),
        &ctx(dir.path(), Duration::from_secs(1)),
      )
      .await
      .expect_err("must time out");

    assert!(matches!(err, ToolError::Timeout(1)));
    assert_eq!(err.to_string(), "Command timed out after 1 seconds.");
    assert!(started.elapsed() < Duration::from_secs(5));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn timeout_kills_the_whole_process_group() {
    let dir = tempfile::tempdir().expect("tempdir");
    let marker = dir.path().join("grandchild_ran");

    // A backgrounded grandchild that would outlive the direct child and
    // leave a marker unless the whole group is taken down.
    let err = RunCommandHandler
      .handle(
        call("(sleep 3 && touch grandchild_ran) & sleep 30"),
        &ctx(dir.path(), Duration::from_secs(1)),
      )
      .await
      .expect_err("must time out");
    assert!(matches!(err, ToolError::Timeout(1)));

    // Past the point where a surviving grandchild would have touched it.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!marker.exists());
  }
}
