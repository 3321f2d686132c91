//! Execution report colorizer
//!
//! Replies that changed the project end with a delimited report block whose
//! `<<reference>>` markers get ANSI colors: path-like references cyan, bare
//! symbol names yellow, delimiters green, section headers dim.

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const REPORT_START: &str = "--- EXECUTION REPORT ---";
pub const REPORT_END: &str = "--- END REPORT ---";

const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const DIM: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

static REF_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"<<(.+?)>>").expect("valid regex"));

/// True when the text carries a complete report block.
pub fn contains_report(text: &str) -> bool {
  text.contains(REPORT_START) && text.contains(REPORT_END)
}

/// Colorize the report block in `text`, leaving surrounding prose untouched.
/// Text without a complete block passes through unchanged.
pub fn format_report(text: &str) -> String {
  let Some(start) = text.find(REPORT_START) else {
    return text.to_string();
  };
  let Some(end) = text.find(REPORT_END) else {
    return text.to_string();
  };
  let block_end = end + REPORT_END.len();

  let mut out = String::with_capacity(text.len() + 64);
  out.push_str(&text[..start]);
  out.push_str(&colorize(&text[start..block_end]));
  out.push_str(&text[block_end..]);
  out
}

fn colorize(report: &str) -> String {
  report
    .split('\n')
    .map(|line| {
      if line.contains(REPORT_START) || line.contains(REPORT_END) {
        return format!("{GREEN}{BOLD}{line}{RESET}");
      }
      if line.trim_start().starts_with("## ") {
        return format!("{DIM}{BOLD}{line}{RESET}");
      }
      REF_PATTERN
        .replace_all(line, |caps: &Captures| colorize_ref(&caps[1]))
        .into_owned()
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn colorize_ref(reference: &str) -> String {
  // Path-like references carry a slash or a dot.
  if reference.contains('/') || reference.contains('.') {
    format!("{CYAN}{BOLD}{reference}{RESET}")
  } else {
    format!("{YELLOW}{BOLD}{reference}{RESET}")
  }
}
