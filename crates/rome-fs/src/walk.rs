use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{error::Result, path::unixify};

/// A file visited by [`recurse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile<'a> {
  /// Full path of the file, `/`-separated.
  pub path:     String,
  /// The directory the walk started from.
  pub root:     &'a Path,
  /// Directory of the file relative to `root`, `/`-separated. [`None`] for
  /// files directly under `root`.
  pub subdir:   Option<String>,
  /// File name.
  pub filename: String,
}

/// Recurse into a directory, calling `callback` for each file (not
/// directory). Symlinked directories are followed and entries are visited in
/// file-name order.
///
/// # Errors
///
/// Returns an error if a directory cannot be read, or the first error the
/// callback returns.
pub fn recurse<F>(root: &Path, mut callback: F) -> Result<()>
where
  F: FnMut(WalkedFile<'_>) -> Result<()>,
{
  let walker = WalkDir::new(root)
    .min_depth(1)
    .follow_links(true)
    .sort_by_file_name();

  for entry in walker {
    let entry = entry?;
    if entry.file_type().is_dir() {
      continue;
    }

    let path = entry.path();
    let subdir = path
      .parent()
      .and_then(|parent| parent.strip_prefix(root).ok())
      .filter(|rel| !rel.as_os_str().is_empty())
      .map(unixify);

    callback(WalkedFile {
      path: unixify(path),
      root,
      subdir,
      filename: entry.file_name().to_string_lossy().into_owned(),
    })?;
  }

  Ok(())
}

/// Collect the paths of every file below `root`, relative to it.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  recurse(root, |file| {
    let relative = file
      .subdir
      .map_or_else(PathBuf::new, PathBuf::from)
      .join(&file.filename);
    files.push(relative);
    Ok(())
  })?;
  Ok(files)
}
