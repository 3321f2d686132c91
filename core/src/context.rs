//! Project context gathering
//!
//! Renders a depth-limited directory tree of the workspace for injection
//! into the system prompt.

use std::fs;
use std::path::Path;

/// Directories that never appear in the tree.
pub const IGNORE_DIRS: &[&str] = &[
  ".git",
  "__pycache__",
  "node_modules",
  ".venv",
  "venv",
  ".env",
  "dist",
  "build",
  "target",
  ".tox",
  ".mypy_cache",
  ".pytest_cache",
  "egg-info",
  ".eggs",
  ".idea",
  ".vscode",
];

/// Files that never appear in the tree.
pub const IGNORE_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Build a box-drawing directory tree rooted at `root`, descending at most
/// `max_depth` levels below the root.
pub fn build_directory_tree(root: &Path, max_depth: usize) -> String {
  let base_name = root
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| root.to_string_lossy().into_owned());

  let mut lines = vec![format!("{base_name}/")];
  walk_tree(root, "", &mut lines, 0, max_depth);
  lines.join("\n")
}

fn walk_tree(path: &Path, prefix: &str, lines: &mut Vec<String>, depth: usize, max_depth: usize) {
  if depth >= max_depth {
    return;
  }
  let Ok(read) = fs::read_dir(path) else {
    return;
  };

  let mut names: Vec<(String, bool)> = read
    .filter_map(|entry| entry.ok())
    .filter_map(|entry| {
      let name = entry.file_name().to_string_lossy().into_owned();
      let is_dir = entry.path().is_dir();
      Some((name, is_dir))
    })
    .collect();
  names.sort();

  let mut dirs: Vec<String> = Vec::new();
  let mut files: Vec<String> = Vec::new();
  for (name, is_dir) in names {
    if is_dir {
      if !IGNORE_DIRS.contains(&name.as_str()) && !name.ends_with(".egg-info") {
        dirs.push(name);
      }
    } else if !IGNORE_FILES.contains(&name.as_str()) {
      files.push(name);
    }
  }

  let entries: Vec<(String, bool)> = dirs
    .into_iter()
    .map(|d| (d, true))
    .chain(files.into_iter().map(|f| (f, false)))
    .collect();

  for (i, (name, is_dir)) in entries.iter().enumerate() {
    let is_last = i == entries.len() - 1;
    let connector = if is_last { "└── " } else { "├── " };
    let display = if *is_dir {
      format!("{name}/")
    } else {
      name.clone()
    };
    lines.push(format!("{prefix}{connector}{display}"));

    if *is_dir {
      let extension = if is_last { "    " } else { "│   " };
      walk_tree(
        &path.join(name),
        &format!("{prefix}{extension}"),
        lines,
        depth + 1,
        max_depth,
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn renders_dirs_before_files_with_connectors() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("mkdir");
    fs::write(dir.path().join("src/main.rs"), "").expect("write");
    fs::write(dir.path().join("Cargo.toml"), "").expect("write");
    fs::write(dir.path().join("README.md"), "").expect("write");

    let tree = build_directory_tree(dir.path(), 4);
    let base = dir
      .path()
      .file_name()
      .expect("name")
      .to_string_lossy()
      .into_owned();
    let expected = format!(
      "{base}/\n├── src/\n│   └── main.rs\n├── Cargo.toml\n└── README.md"
    );
    assert_eq!(tree, expected);
  }

  #[test]
  fn skips_ignored_directories_and_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join(".git")).expect("mkdir");
    fs::create_dir_all(dir.path().join("node_modules")).expect("mkdir");
    fs::create_dir_all(dir.path().join("demo.egg-info")).expect("mkdir");
    fs::write(dir.path().join(".DS_Store"), "").expect("write");
    fs::write(dir.path().join("keep.txt"), "").expect("write");

    let tree = build_directory_tree(dir.path(), 4);
    assert!(!tree.contains(".git"));
    assert!(!tree.contains("node_modules"));
    assert!(!tree.contains("egg-info"));
    assert!(!tree.contains(".DS_Store"));
    assert!(tree.contains("└── keep.txt"));
  }

  #[test]
  fn depth_limit_prunes_deep_levels() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("a/b/c")).expect("mkdir");
    fs::write(dir.path().join("a/b/c/deep.txt"), "").expect("write");

    let tree = build_directory_tree(dir.path(), 2);
    assert!(tree.contains("a/"));
    assert!(tree.contains("b/"));
    assert!(!tree.contains("c/"));
    assert!(!tree.contains("deep.txt"));
  }
}
