// Per-project configuration file (orangutan.md)
// Detection, generation, reading, and section updates.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".orangutan-config";
pub const CONFIG_FILE: &str = "orangutan.md";

/// Files scanned when auto-generating the project config.
pub const KEY_FILES: &[&str] = &[
  "package.json",
  "pyproject.toml",
  "Cargo.toml",
  "go.mod",
  "pom.xml",
  "build.gradle",
  "composer.json",
  "Gemfile",
  "docker-compose.yml",
  "docker-compose.yaml",
  "Dockerfile",
  "Makefile",
  "README.md",
  "README.rst",
  ".env.example",
  ".env.sample",
  "tsconfig.json",
  ".eslintrc.json",
  ".eslintrc.js",
  "vite.config.ts",
  "vite.config.js",
  "next.config.js",
  "next.config.ts",
  "webpack.config.js",
  "requirements.txt",
  "setup.py",
  "setup.cfg",
];

const TEMPLATE_HEADER: &str = "\
# Orangutan Code — Project Configuration
# This file is read by Orangutan Code on every session startup.
# The model uses it as context before any interaction.
# You can edit this file to guide the assistant's behavior.
";

/// Full path to orangutan.md inside the project.
pub fn config_path(root: &Path) -> PathBuf {
  root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Whether orangutan.md exists in the project.
pub fn config_exists(root: &Path) -> bool {
  config_path(root).is_file()
}

/// Read orangutan.md, returning an empty string when absent.
pub fn read_project_file(root: &Path) -> String {
  fs::read_to_string(config_path(root)).unwrap_or_default()
}

/// Write orangutan.md, creating the config directory if needed.
pub fn write_project_file(root: &Path, content: &str) -> io::Result<PathBuf> {
  let dir = root.join(CONFIG_DIR);
  fs::create_dir_all(&dir)?;
  let path = config_path(root);
  fs::write(&path, content)?;
  Ok(path)
}

/// Replace the body of a `## section` in the config text, or append the
/// section when it does not exist yet. New sections are inserted before
/// `## Notes` when present, otherwise at the end.
pub fn update_section(current: &str, section: &str, content: &str) -> String {
  let header = format!("## {section}");

  if let Some(start) = current.find(&header) {
    let after_header = start + header.len();
    let end = current[after_header..]
      .find("\n## ")
      .map(|idx| after_header + idx)
      .unwrap_or(current.len());
    format!(
      "{}\n{}\n{}",
      &current[..after_header],
      content,
      &current[end..]
    )
  } else if let Some(notes) = current.find("## Notes") {
    format!(
      "{}{}\n{}\n\n{}",
      &current[..notes],
      header,
      content,
      &current[notes..]
    )
  } else {
    format!("{}\n\n{}\n{}\n", current.trim_end(), header, content)
  }
}

/// Key files present in the project root.
pub fn detect_key_files(root: &Path) -> Vec<&'static str> {
  KEY_FILES
    .iter()
    .copied()
    .filter(|name| root.join(name).is_file())
    .collect()
}

fn read_key_file_summary(root: &Path, filename: &str, max_lines: usize) -> String {
  let Ok(content) = fs::read_to_string(root.join(filename)) else {
    return String::new();
  };
  let lines: Vec<&str> = content.lines().collect();
  let mut summary = lines[..lines.len().min(max_lines)].join("\n");
  if lines.len() > max_lines {
    summary.push_str(&format!("\n... ({} more lines)", lines.len() - max_lines));
  }
  summary
}

/// Build an auto-generated orangutan.md from project analysis.
pub fn build_auto_config(root: &Path, tree: &str) -> String {
  let found = detect_key_files(root);

  let mut stack_items: Vec<String> = Vec::new();
  let mut setup_parts: Vec<String> = Vec::new();
  let mut overview_parts: Vec<String> = Vec::new();

  let push_stack = |items: &mut Vec<String>, item: &str| {
    if !items.iter().any(|existing| existing.contains(item)) {
      items.push(format!("- {item}"));
    }
  };

  for filename in &found {
    match *filename {
      "package.json" => {
        push_stack(&mut stack_items, "Node.js / JavaScript/TypeScript");
        setup_parts.push("- `npm install` to install dependencies".to_string());
        setup_parts.push("- Check `package.json` scripts for available commands".to_string());
      }
      "pyproject.toml" => {
        push_stack(&mut stack_items, "Python");
        setup_parts.push("- `pip install -e .` or `pip install -r requirements.txt`".to_string());
      }
      "Cargo.toml" => {
        push_stack(&mut stack_items, "Rust");
        setup_parts.push("- `cargo build` to compile".to_string());
      }
      "go.mod" => {
        push_stack(&mut stack_items, "Go");
        setup_parts.push("- `go build` to compile".to_string());
      }
      "docker-compose.yml" | "docker-compose.yaml" => {
        push_stack(&mut stack_items, "Docker / Docker Compose");
        setup_parts.push("- `docker-compose up -d` to start containers".to_string());
      }
      "Dockerfile" => push_stack(&mut stack_items, "Docker"),
      "requirements.txt" => {
        if !stack_items.iter().any(|item| item.contains("Python")) {
          push_stack(&mut stack_items, "Python");
          setup_parts.push("- `pip install -r requirements.txt`".to_string());
        }
      }
      "tsconfig.json" => push_stack(&mut stack_items, "TypeScript"),
      "vite.config.ts" | "vite.config.js" => {
        push_stack(&mut stack_items, "Vite (frontend bundler)")
      }
      "next.config.js" | "next.config.ts" => push_stack(&mut stack_items, "Next.js"),
      _ => {}
    }
  }

  if found.contains(&"README.md") {
    overview_parts.push(read_key_file_summary(root, "README.md", 15));
  }

  let overview = if overview_parts.is_empty() {
    "<!-- Add a brief project description here -->".to_string()
  } else {
    overview_parts.join("\n")
  };
  let stack = if stack_items.is_empty() {
    "<!-- Add your tech stack here -->".to_string()
  } else {
    stack_items.join("\n")
  };
  let key_files = if found.is_empty() {
    "- No common config files detected".to_string()
  } else {
    found
      .iter()
      .map(|f| format!("- `{f}`"))
      .collect::<Vec<_>>()
      .join("\n")
  };
  let setup = if setup_parts.is_empty() {
    "<!-- Add setup instructions here -->".to_string()
  } else {
    setup_parts.join("\n")
  };

  format!(
    "{TEMPLATE_HEADER}
## Project Overview
{overview}

## Tech Stack
{stack}

## Project Structure
```
{tree}
```

## Key Files Detected
{key_files}

## Development Setup
{setup}

## Conventions & Preferences
<!-- Add your preferences here. Examples: -->
<!-- - Code style: use single quotes, 2-space indent -->
<!-- - Language: always respond in English -->
<!-- - Commits: use conventional commits format -->
<!-- - Testing: always run tests before committing -->

## Notes
<!-- Add any notes the assistant should know about this project -->
"
  )
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn update_replaces_existing_section_body() {
    let current = "# Config\n\n## Tech Stack\n- Python\n\n## Notes\nkeep\n";
    let updated = update_section(current, "Tech Stack", "- Rust");

    assert!(updated.contains("## Tech Stack\n- Rust\n"));
    assert!(!updated.contains("- Python"));
    assert!(updated.contains("## Notes\nkeep"));
  }

  #[test]
  fn update_inserts_new_section_before_notes() {
    let current = "# Config\n\n## Notes\nkeep\n";
    let updated = update_section(current, "Conventions", "- tabs");

    let conventions = updated.find("## Conventions").expect("section added");
    let notes = updated.find("## Notes").expect("notes kept");
    assert!(conventions < notes);
  }

  #[test]
  fn update_appends_section_without_notes() {
    let updated = update_section("# Config", "Extras", "- x");
    assert_eq!(updated, "# Config\n\n## Extras\n- x\n");
  }

  #[test]
  fn writes_and_reads_project_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(!config_exists(dir.path()));

    write_project_file(dir.path(), "hello").expect("write config");
    assert!(config_exists(dir.path()));
    assert_eq!(read_project_file(dir.path()), "hello");
  }

  #[test]
  fn auto_config_detects_rust_project() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("Cargo.toml"), "[package]").expect("write");

    let generated = build_auto_config(dir.path(), "proj/");
    assert!(generated.contains("- Rust"));
    assert!(generated.contains("`cargo build`"));
    assert!(generated.contains("- `Cargo.toml`"));
  }
}
