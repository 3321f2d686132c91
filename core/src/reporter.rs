//! Step reporter
//!
//! Receives a short status line per tool execution for real-time display.
//! Purely observational: the `()` return keeps it off the loop's error path.

use std::io::Write;

pub trait StepReporter: Send + Sync {
  fn step(&self, tool: &str, detail: &str);
}

/// Prints dim step-trace lines to stdout.
pub struct ConsoleReporter;

impl StepReporter for ConsoleReporter {
  fn step(&self, tool: &str, detail: &str) {
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "\x1b[90m  -> [{tool}] {detail}\x1b[0m");
    let _ = stdout.flush();
  }
}

/// Discards step lines. Used in tests.
pub struct NullReporter;

impl StepReporter for NullReporter {
  fn step(&self, _tool: &str, _detail: &str) {}
}
