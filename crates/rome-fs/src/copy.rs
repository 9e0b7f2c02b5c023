use std::path::Path;

use glob::MatchOptions;
use log::{debug, info};

use crate::{
  error::{FsError, Result},
  path::is_dir,
  read::{ReadOptions, read, read_bytes},
  walk::list_files,
  wildcard::is_match,
  write::{WriteOptions, write, write_bytes},
};

/// Content processor for [`copy`]. Receives the decoded text and the source
/// path; returning `Ok(None)` skips writing that file.
pub type ProcessFn<'a> =
  dyn Fn(String, &Path) -> std::result::Result<Option<String>, String> + 'a;

/// Options for [`copy`].
#[derive(Default)]
pub struct CopyOptions<'a> {
  /// Optional content processor. Without one, files are copied byte for
  /// byte.
  pub process:    Option<Box<ProcessFn<'a>>>,
  /// Source paths matching any of these patterns are copied verbatim even
  /// when a processor is set.
  pub no_process: Vec<String>,
  /// Encoding used to read and write processed files.
  pub read:       ReadOptions,
  pub write:      WriteOptions,
}

impl std::fmt::Debug for CopyOptions<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CopyOptions")
      .field("process", &self.process.is_some())
      .field("no_process", &self.no_process)
      .field("read", &self.read)
      .field("write", &self.write)
      .finish()
  }
}

/// Copy a file, optionally processing its content. A directory is copied
/// recursively, file by file, preserving its layout under `dest`.
///
/// # Errors
///
/// Returns an error if a source cannot be read, the processor fails, or a
/// destination cannot be written.
pub fn copy(src: &Path, dest: &Path, options: &CopyOptions<'_>) -> Result<()> {
  if is_dir(src) {
    for relative in list_files(src)? {
      copy_file(&src.join(&relative), &dest.join(&relative), options)?;
    }
    return Ok(());
  }

  copy_file(src, dest, options)
}

fn copy_file(src: &Path, dest: &Path, options: &CopyOptions<'_>) -> Result<()> {
  let processor = match &options.process {
    Some(process)
      if !is_match(&options.no_process, &[src], MatchOptions::new())? =>
    {
      process
    },
    _ => {
      debug!("Copying {} -> {}", src.display(), dest.display());
      return write_bytes(dest, &read_bytes(src)?);
    },
  };

  let contents = read(src, &options.read)?;
  debug!("Processing {}", src.display());
  let processed = processor(contents, src).map_err(|message| {
    FsError::Process {
      path: src.to_path_buf(),
      message,
    }
  })?;

  match processed {
    Some(contents) => write(dest, &contents, &options.write),
    None => {
      info!("Write aborted for {}", dest.display());
      Ok(())
    },
  }
}
