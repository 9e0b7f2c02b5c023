use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for rome-fs operations.
///
/// Every variant that touches the filesystem carries the offending path so
/// callers can report it without extra context.
#[derive(Debug, Error)]
pub enum FsError {
  #[error("Unable to read \"{}\" file: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("Unable to write \"{}\" file: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("Unable to create directory \"{}\": {source}", path.display())]
  Mkdir { path: PathBuf, source: io::Error },

  #[error("Unable to parse \"{}\" file: {message}", path.display())]
  Parse { path: PathBuf, message: String },

  #[error("Unable to delete \"{}\": {message}", path.display())]
  Delete { path: PathBuf, message: String },

  #[error("Error while processing \"{}\" file: {message}", path.display())]
  Process { path: PathBuf, message: String },

  #[error("Unknown encoding: {0}")]
  UnknownEncoding(String),

  #[error("Invalid glob pattern: {0}")]
  Pattern(#[from] glob::PatternError),

  #[error("Glob error: {0}")]
  Glob(#[from] glob::GlobError),

  #[error("Directory walk error: {0}")]
  Walk(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;
