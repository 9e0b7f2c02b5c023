use std::io;

use rome_fs::FsError;
use thiserror::Error;

/// Result type for inlining operations.
pub type Result<T> = std::result::Result<T, InlineError>;

/// Fatal errors raised by the inlining pipeline.
///
/// Unreadable scripts are not errors; they are reported as
/// [`Warning`](crate::warning::Warning)s instead.
#[derive(Debug, Error)]
pub enum InlineError {
  #[error(transparent)]
  Fs(#[from] FsError),

  #[error("Invalid selector: {0}")]
  Selector(String),

  #[error("Failed to process stylesheet {file}: {message}")]
  Css { file: String, message: String },

  #[error("Failed to minify {language}: {message}")]
  Minify {
    language: &'static str,
    message:  String,
  },

  #[error("Failed to serialize document: {0}")]
  Serialize(#[from] io::Error),
}
