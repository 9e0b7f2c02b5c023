use std::{fs, path::Path};

use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::error::{FsError, Result};

/// Options for [`write`].
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
  /// Encoding used to encode text. Defaults to UTF-8.
  ///
  /// `encoding_rs` cannot produce UTF-16, so UTF-16 labels fall back to
  /// UTF-8 output.
  pub encoding: &'static Encoding,
}

impl Default for WriteOptions {
  fn default() -> Self {
    Self { encoding: UTF_8 }
  }
}

/// Like `mkdir -p`. Create a directory and any intermediary directories.
///
/// # Errors
///
/// Returns [`FsError::Mkdir`] if a component cannot be created.
pub fn mkdir(path: &Path) -> Result<()> {
  if path.as_os_str().is_empty() {
    return Ok(());
  }
  fs::create_dir_all(path).map_err(|source| {
    FsError::Mkdir {
      path: path.to_path_buf(),
      source,
    }
  })
}

/// Write raw bytes, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_bytes(path: &Path, contents: &[u8]) -> Result<()> {
  if let Some(parent) = path.parent() {
    mkdir(parent)?;
  }
  debug!("Writing {}", path.display());
  fs::write(path, contents).map_err(|source| {
    FsError::Write {
      path: path.to_path_buf(),
      source,
    }
  })
}

/// Encode text and write it, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write(path: &Path, contents: &str, options: &WriteOptions) -> Result<()> {
  let (bytes, ..) = options.encoding.encode(contents);
  write_bytes(path, &bytes)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Tests can unwrap")]

  use encoding_rs::WINDOWS_1252;
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_write_creates_parents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a/b/c.txt");

    write(&path, "hello", &WriteOptions::default()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
  }

  #[test]
  fn test_write_encoded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    let options = WriteOptions {
      encoding: WINDOWS_1252,
    };

    write(&path, "café", &options).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"caf\xE9");
  }

  #[test]
  fn test_mkdir_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x/y");
    mkdir(&path).unwrap();
    mkdir(&path).unwrap();
    assert!(path.is_dir());
  }
}
