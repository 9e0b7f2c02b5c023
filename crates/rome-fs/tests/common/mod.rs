#![allow(clippy::expect_used, reason = "Fine in tests")]
#![allow(dead_code, reason = "Not every test binary uses every helper")]

use std::{fs, path::Path};

use tempfile::TempDir;

/// Create a temporary directory populated with the given `(path, content)`
/// files.
pub fn tree(files: &[(&str, &str)]) -> TempDir {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  for (path, content) in files {
    write(dir.path(), path, content);
  }
  dir
}

pub fn write(root: &Path, path: &str, content: &str) {
  let full = root.join(path);
  if let Some(parent) = full.parent() {
    fs::create_dir_all(parent).expect("Failed to create dir in test");
  }
  fs::write(full, content).expect("Failed to write file in test");
}
