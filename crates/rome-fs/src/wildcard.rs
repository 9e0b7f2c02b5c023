//! Wildcard expansion and matching.
//!
//! Both [`expand`] and [`match_paths`] process a list of patterns in order.
//! A pattern starting with `!` removes its matches from the result set built
//! so far; any other pattern adds its matches, skipping duplicates. The
//! result keeps first-seen order.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use indexmap::IndexSet;

use crate::error::Result;

/// Restrict [`expand`] results to one kind of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
  File,
  Dir,
}

impl Filter {
  fn accepts(self, path: &Path) -> bool {
    match self {
      Self::File => path.is_file(),
      Self::Dir => path.is_dir(),
    }
  }
}

/// Options for [`expand`].
#[derive(Debug, Clone, Default)]
pub struct ExpandOptions {
  /// Directory patterns are relative to. Returned paths are relative to it
  /// as well. Defaults to the process working directory.
  pub cwd:     Option<PathBuf>,
  /// Keep only entries of this kind.
  pub filter:  Option<Filter>,
  /// Passed through to the glob matcher.
  pub matcher: MatchOptions,
}

fn process_patterns<S, F>(patterns: &[S], mut find: F) -> Result<Vec<PathBuf>>
where
  S: AsRef<str>,
  F: FnMut(&str) -> Result<Vec<PathBuf>>,
{
  let mut result: IndexSet<PathBuf> = IndexSet::new();

  for pattern in patterns {
    let pattern = pattern.as_ref();
    if let Some(excluded) = pattern.strip_prefix('!') {
      let matches = find(excluded)?;
      result.retain(|p| !matches.contains(p));
    } else {
      result.extend(find(pattern)?);
    }
  }

  Ok(result.into_iter().collect())
}

/// Return every filesystem path matching the given patterns.
///
/// # Errors
///
/// Returns an error if a pattern is invalid or a matched entry cannot be
/// read.
pub fn expand<S: AsRef<str>>(
  patterns: &[S],
  options: &ExpandOptions,
) -> Result<Vec<PathBuf>> {
  let cwd = options.cwd.as_deref();

  let matches = process_patterns(patterns, |pattern| {
    let full = cwd.map_or_else(
      || pattern.to_string(),
      |cwd| cwd.join(pattern).to_string_lossy().into_owned(),
    );

    let mut found = Vec::new();
    for entry in glob::glob_with(&full, options.matcher)? {
      let path = entry?;
      let relative = cwd
        .and_then(|cwd| path.strip_prefix(cwd).ok())
        .map_or_else(|| path.clone(), Path::to_path_buf);
      found.push(relative);
    }
    Ok(found)
  })?;

  let Some(filter) = options.filter else {
    return Ok(matches);
  };

  Ok(
    matches
      .into_iter()
      .filter(|p| filter.accepts(&cwd.map_or_else(|| p.clone(), |c| c.join(p))))
      .collect(),
  )
}

/// Match explicit paths against the given patterns, returning the matching
/// subset.
///
/// # Errors
///
/// Returns an error if a pattern is invalid.
pub fn match_paths<S: AsRef<str>, P: AsRef<Path>>(
  patterns: &[S],
  paths: &[P],
  options: MatchOptions,
) -> Result<Vec<PathBuf>> {
  if patterns.is_empty() || paths.is_empty() {
    return Ok(Vec::new());
  }

  process_patterns(patterns, |pattern| {
    let compiled = Pattern::new(pattern)?;
    Ok(
      paths
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| compiled.matches_path_with(p, options))
        .map(Path::to_path_buf)
        .collect(),
    )
  })
}

/// True if any of the paths survives [`match_paths`].
///
/// # Errors
///
/// Returns an error if a pattern is invalid.
pub fn is_match<S: AsRef<str>, P: AsRef<Path>>(
  patterns: &[S],
  paths: &[P],
  options: MatchOptions,
) -> Result<bool> {
  Ok(!match_paths(patterns, paths, options)?.is_empty())
}
