use std::{
  fs,
  path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
  error::{FsError, Result},
  path::{is_link, is_path_cwd, is_path_in_cwd},
};

/// Options for [`delete`].
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
  /// Allow deleting the working directory itself or anything outside it.
  pub force: bool,
  /// The directory deletions are confined to. Defaults to the process
  /// working directory.
  pub cwd:   Option<PathBuf>,
}

/// Delete a file or directory recursively.
///
/// A relative `path` is resolved against [`DeleteOptions::cwd`], so paths
/// returned by [`crate::expand`] with the same `cwd` can be passed straight
/// through.
///
/// Returns `Ok(false)` without touching anything when the path does not
/// exist, or, unless `force` is set, when it is the working directory or
/// lies outside of it. A symlink is removed itself, never its target.
///
/// # Errors
///
/// Returns an error if the working directory cannot be determined or the
/// removal fails.
pub fn delete(path: &Path, options: &DeleteOptions) -> Result<bool> {
  let cwd = match &options.cwd {
    Some(cwd) => cwd.clone(),
    None => {
      std::env::current_dir().map_err(|source| {
        FsError::Read {
          path: PathBuf::from("."),
          source,
        }
      })?
    },
  };
  let path = if path.is_relative() {
    cwd.join(path)
  } else {
    path.to_path_buf()
  };
  let path = path.as_path();

  if !path.exists() && !is_link(path) {
    warn!("Cannot delete nonexistent file {}", path.display());
    return Ok(false);
  }

  if !options.force {
    if is_path_cwd(&cwd, path) {
      warn!("Cannot delete the current working directory");
      return Ok(false);
    }
    if !is_path_in_cwd(&cwd, path) {
      warn!(
        "Cannot delete files outside the current working directory: {}",
        path.display()
      );
      return Ok(false);
    }
  }

  debug!("Deleting {}", path.display());
  if is_link(path) {
    fs::remove_file(path).map_err(|e| {
      FsError::Delete {
        path:    path.to_path_buf(),
        message: e.to_string(),
      }
    })?;
  } else {
    fs_extra::remove_items(&[path]).map_err(|e| {
      FsError::Delete {
        path:    path.to_path_buf(),
        message: e.to_string(),
      }
    })?;
  }

  Ok(true)
}
