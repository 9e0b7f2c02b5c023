use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result, bail};
use log::{info, warn};
use rome_config::Config;
use rome_fs::{ExpandOptions, Filter};
use rome_inline::{InlineOutput, Inliner};

/// Write a default configuration file to `output`.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn init(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!(
      "Failed to generate configuration file: {}",
      output.display()
    )
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize how pages \
     are inlined."
  );
  Ok(())
}

/// Run the inlining pipeline on `source`.
///
/// `output` wins over the configured default destination. Warnings are
/// logged and also returned.
///
/// # Errors
///
/// Returns an error if the pipeline fails.
pub fn inline(
  config: Config,
  source: &Path,
  output: Option<&Path>,
) -> Result<InlineOutput> {
  let dest = output.map(Path::to_path_buf).or_else(|| config.output.clone());
  let inliner = Inliner::new(config);

  let result = inliner
    .inline(source, dest.as_deref())
    .wrap_err_with(|| format!("Failed to inline {}", source.display()))?;

  for warning in &result.warnings {
    warn!("{warning}");
  }
  if !result.warnings.is_empty() {
    info!("Finished with {} warning(s)", result.warnings.len());
  }

  Ok(result)
}

/// Expand glob patterns relative to `cwd`.
///
/// # Errors
///
/// Returns an error if a pattern is invalid or a match cannot be read.
pub fn expand(
  patterns: &[String],
  cwd: Option<PathBuf>,
  filter: Option<Filter>,
) -> Result<Vec<PathBuf>> {
  let options = ExpandOptions {
    cwd,
    filter,
    ..Default::default()
  };
  rome_fs::expand(patterns, &options).wrap_err("Failed to expand patterns")
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Tests can unwrap")]

  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_init_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rome.toml");
    fs::write(&path, "# mine\n").unwrap();

    assert!(init(&path, "toml", false).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

    init(&path, "toml", true).unwrap();
    let written = Config::from_file(&path).unwrap();
    assert_eq!(written.embed_attribute, "rome-embed");
  }

  #[test]
  fn test_init_json_creates_parents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("conf/rome.json");
    init(&path, "json", false).unwrap();
    assert!(Config::from_file(&path).unwrap().postprocess.minify_html);
  }

  #[test]
  fn test_inline_uses_configured_output() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join("index.html"),
      "<html><body><p>hi</p></body></html>",
    )
    .unwrap();

    let config = Config {
      output: Some(PathBuf::from("out/bundle.html")),
      ..Default::default()
    };
    let result = inline(config, &dir.path().join("index.html"), None).unwrap();

    let written = dir.path().join("out/bundle.html");
    assert_eq!(result.written.as_deref(), Some(written.as_path()));
    assert_eq!(fs::read_to_string(written).unwrap(), result.html);
  }

  #[test]
  fn test_inline_flag_overrides_configured_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<p>hi</p>").unwrap();

    let config = Config {
      output: Some(PathBuf::from("configured.html")),
      ..Default::default()
    };
    inline(
      config,
      &dir.path().join("index.html"),
      Some(Path::new("flag.html")),
    )
    .unwrap();

    assert!(dir.path().join("flag.html").is_file());
    assert!(!dir.path().join("configured.html").exists());
  }

  #[test]
  fn test_expand_with_filter() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("js")).unwrap();
    fs::write(dir.path().join("js/app.js"), "").unwrap();

    let all = expand(&["*".to_string()], Some(dir.path().to_path_buf()), None)
      .unwrap();
    assert_eq!(all, [PathBuf::from("js")]);

    let files = expand(
      &["**/*".to_string()],
      Some(dir.path().to_path_buf()),
      Some(Filter::File),
    )
    .unwrap();
    assert_eq!(files, [PathBuf::from("js/app.js")]);
  }
}
