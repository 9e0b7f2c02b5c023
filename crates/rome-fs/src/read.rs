use std::{fs, path::Path};

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use serde::de::DeserializeOwned;

use crate::error::{FsError, Result};

const BOM: char = '\u{FEFF}';

/// Options for [`read`].
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
  /// Encoding used to decode the file. Defaults to UTF-8.
  pub encoding: &'static Encoding,
}

impl Default for ReadOptions {
  fn default() -> Self {
    Self { encoding: UTF_8 }
  }
}

impl ReadOptions {
  /// Build options from a WHATWG encoding label such as `"latin1"` or
  /// `"utf-16le"`.
  ///
  /// # Errors
  ///
  /// Returns [`FsError::UnknownEncoding`] if the label is not recognized.
  pub fn with_label(label: &str) -> Result<Self> {
    Encoding::for_label(label.trim().as_bytes())
      .map(|encoding| Self { encoding })
      .ok_or_else(|| FsError::UnknownEncoding(label.to_string()))
  }
}

/// Read a file as raw bytes.
///
/// # Errors
///
/// Returns [`FsError::Read`] if the file is missing or unreadable.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
  fs::read(path).map_err(|source| {
    FsError::Read {
      path: path.to_path_buf(),
      source,
    }
  })
}

/// Read a file and decode it to a string.
///
/// Malformed sequences are replaced with U+FFFD. A leading byte order mark is
/// stripped after decoding.
///
/// # Errors
///
/// Returns [`FsError::Read`] if the file is missing or unreadable.
pub fn read(path: &Path, options: &ReadOptions) -> Result<String> {
  debug!("Reading {}", path.display());
  let bytes = read_bytes(path)?;
  let (text, _) = options.encoding.decode_without_bom_handling(&bytes);
  Ok(
    text
      .strip_prefix(BOM)
      .map_or_else(|| text.to_string(), ToString::to_string),
  )
}

/// Read a JSON file and deserialize it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON for `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let src = read(path, &ReadOptions::default())?;
  serde_json::from_str(&src).map_err(|e| {
    FsError::Parse {
      path:    path.to_path_buf(),
      message: e.to_string(),
    }
  })
}

/// Read a TOML file and deserialize it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for `T`.
pub fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let src = read(path, &ReadOptions::default())?;
  toml::from_str(&src).map_err(|e| {
    FsError::Parse {
      path:    path.to_path_buf(),
      message: e.to_string(),
    }
  })
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Tests can unwrap")]

  use serde::Deserialize;
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_read_strips_bom() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bom.txt");
    fs::write(&path, b"\xEF\xBB\xBFhello").unwrap();

    assert_eq!(read(&path, &ReadOptions::default()).unwrap(), "hello");
  }

  #[test]
  fn test_read_latin1() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, b"caf\xE9").unwrap();

    let options = ReadOptions::with_label("latin1").unwrap();
    assert_eq!(read(&path, &options).unwrap(), "café");
  }

  #[test]
  fn test_unknown_label() {
    assert!(matches!(
      ReadOptions::with_label("klingon"),
      Err(FsError::UnknownEncoding(_))
    ));
  }

  #[test]
  fn test_read_missing_file() {
    let dir = tempdir().unwrap();
    let err = read(&dir.path().join("nope.txt"), &ReadOptions::default())
      .unwrap_err();
    assert!(matches!(err, FsError::Read { .. }));
    assert!(err.to_string().contains("nope.txt"));
  }

  #[derive(Debug, Deserialize)]
  struct Manifest {
    name: String,
  }

  #[test]
  fn test_read_json_and_toml() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("a.json");
    let toml = dir.path().join("a.toml");
    fs::write(&json, r#"{"name": "site"}"#).unwrap();
    fs::write(&toml, "name = \"site\"\n").unwrap();

    assert_eq!(read_json::<Manifest>(&json).unwrap().name, "site");
    assert_eq!(read_toml::<Manifest>(&toml).unwrap().name, "site");
  }

  #[test]
  fn test_read_json_parse_error_names_file() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("broken.json");
    fs::write(&json, "{").unwrap();

    let err = read_json::<Manifest>(&json).unwrap_err();
    assert!(matches!(err, FsError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
  }
}
