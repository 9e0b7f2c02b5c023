use std::{
  fs,
  path::{Component, Path, PathBuf},
};

/// Normalize `\` separators to `/` on Windows. Identity elsewhere.
#[must_use]
pub fn unixify(path: &Path) -> String {
  let s = path.to_string_lossy();
  if cfg!(windows) {
    s.replace('\\', "/")
  } else {
    s.into_owned()
  }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component where possible. The filesystem is never consulted.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        match out.components().next_back() {
          Some(Component::Normal(_)) => {
            out.pop();
          },
          Some(Component::RootDir | Component::Prefix(_)) => {},
          _ => out.push(".."),
        }
      },
      other => out.push(other.as_os_str()),
    }
  }
  out
}

/// Join `relative` onto `base` and normalize the result.
///
/// An absolute `relative` replaces `base` entirely.
#[must_use]
pub fn resolve(base: &Path, relative: &Path) -> PathBuf {
  normalize(&base.join(relative))
}

/// Make a path absolute against the process working directory, then
/// normalize it.
fn absolutize(path: &Path) -> PathBuf {
  std::path::absolute(path)
    .map_or_else(|_| normalize(path), |absolute| normalize(&absolute))
}

/// True if the path exists.
#[must_use]
pub fn exists(path: &Path) -> bool {
  path.exists()
}

/// True if the path is a directory (following symlinks).
#[must_use]
pub fn is_dir(path: &Path) -> bool {
  path.is_dir()
}

/// True if the path is a regular file (following symlinks).
#[must_use]
pub fn is_file(path: &Path) -> bool {
  path.is_file()
}

/// True if the path itself is a symbolic link.
#[must_use]
pub fn is_link(path: &Path) -> bool {
  fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}

/// Is the path absolute and already in normal form?
///
/// Trailing separators are ignored, so `/srv/site/` is absolute while
/// `/srv/../site` is not.
#[must_use]
pub fn is_path_absolute(path: &Path) -> bool {
  let raw = path.to_string_lossy();
  let trimmed = raw.trim_end_matches(['/', '\\']);
  let candidate = if trimmed.is_empty() {
    path
  } else {
    Path::new(trimmed)
  };

  candidate.is_absolute()
    && normalize(candidate).as_os_str() == candidate.as_os_str()
}

/// Do all the given paths refer to the same location once made absolute?
#[must_use]
pub fn are_paths_equivalent<P: AsRef<Path>>(paths: &[P]) -> bool {
  let mut iter = paths.iter().map(|p| absolutize(p.as_ref()));
  let Some(first) = iter.next() else {
    return true;
  };
  iter.all(|p| p == first)
}

/// Are all `descendants` strictly contained within `ancestor`?
///
/// A path is not contained within itself. Existence is not checked.
#[must_use]
pub fn does_path_contain<P: AsRef<Path>>(
  ancestor: &Path,
  descendants: &[P],
) -> bool {
  let ancestor = absolutize(ancestor);
  descendants.iter().all(|descendant| {
    let descendant = absolutize(descendant.as_ref());
    descendant != ancestor && descendant.starts_with(&ancestor)
  })
}

/// Is `path` the working directory `cwd`? Symlinks in `path` are resolved;
/// a path that cannot be resolved is never the working directory.
#[must_use]
pub fn is_path_cwd(cwd: &Path, path: &Path) -> bool {
  fs::canonicalize(path)
    .is_ok_and(|real| are_paths_equivalent(&[canonical_or_self(cwd), real]))
}

/// Is `path` strictly inside the working directory `cwd`?
#[must_use]
pub fn is_path_in_cwd(cwd: &Path, path: &Path) -> bool {
  fs::canonicalize(path)
    .is_ok_and(|real| does_path_contain(&canonical_or_self(cwd), &[real]))
}

fn canonical_or_self(path: &Path) -> PathBuf {
  fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
