//! Filesystem sandbox
//!
//! Every filesystem tool resolves its path through [`resolve_in_root`].
//! Resolution that would leave the project root (absolute paths outside the
//! root, `..` traversal, symlinks pointing out) fails with `PathEscape`
//! before any I/O happens. This is the single security invariant shared by
//! all filesystem tools.

use std::path::{Component, Path, PathBuf};

use super::context::ToolError;

/// Resolve `requested` against the project root, rejecting any result that
/// escapes it. The returned path is lexically normalized and safe to use for
/// reads, writes, and creation of missing files.
pub fn resolve_in_root(root: &Path, requested: &str) -> Result<PathBuf, ToolError> {
  let escape = || ToolError::PathEscape(requested.to_string());

  let root = root.canonicalize().map_err(ToolError::Io)?;
  let raw = Path::new(requested);
  let joined = if raw.is_absolute() {
    raw.to_path_buf()
  } else {
    root.join(raw)
  };

  let mut normalized = PathBuf::new();
  for component in joined.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !normalized.pop() {
          return Err(escape());
        }
      }
      other => normalized.push(other),
    }
  }

  if !normalized.starts_with(&root) {
    return Err(escape());
  }

  // Symlink traversal check: canonicalize the deepest existing ancestor and
  // verify the real location still sits under the root.
  let mut existing = normalized.clone();
  let mut missing_tail: Vec<std::ffi::OsString> = Vec::new();
  while !existing.exists() {
    let Some(name) = existing.file_name() else {
      return Err(escape());
    };
    missing_tail.push(name.to_os_string());
    existing.pop();
  }

  let mut resolved = existing.canonicalize().map_err(ToolError::Io)?;
  for name in missing_tail.iter().rev() {
    resolved.push(name);
  }
  if !resolved.starts_with(&root) {
    return Err(escape());
  }

  Ok(normalized)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn root() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
  }

  #[test]
  fn relative_path_inside_root_resolves() {
    let dir = root();
    let resolved = resolve_in_root(dir.path(), "src/main.rs").expect("resolve");
    assert!(resolved.starts_with(dir.path().canonicalize().expect("canonical root")));
    assert!(resolved.ends_with("src/main.rs"));
  }

  #[test]
  fn parent_traversal_is_rejected_without_io() {
    let dir = root();
    let err = resolve_in_root(dir.path(), "../../etc/passwd").expect_err("must escape");
    assert!(matches!(err, ToolError::PathEscape(_)));
    assert_eq!(
      err.to_string(),
      "Path '../../etc/passwd' escapes the project directory."
    );
  }

  #[test]
  fn absolute_path_outside_root_is_rejected() {
    let dir = root();
    let err = resolve_in_root(dir.path(), "/etc/passwd").expect_err("must escape");
    assert!(matches!(err, ToolError::PathEscape(_)));
  }

  #[test]
  fn dot_segments_are_normalized() {
    let dir = root();
    let resolved = resolve_in_root(dir.path(), "./a/./b.txt").expect("resolve");
    assert!(resolved.ends_with("a/b.txt"));
  }

  #[cfg(unix)]
  #[test]
  fn symlink_pointing_outside_root_is_rejected() {
    let outside = root();
    let dir = root();
    std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).expect("symlink");

    let err = resolve_in_root(dir.path(), "link/secret.txt").expect_err("must escape");
    assert!(matches!(err, ToolError::PathEscape(_)));
  }
}
