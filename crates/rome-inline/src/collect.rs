//! Asset collection: pull local scripts and stylesheets out of the document.

use std::{
  path::{Path, PathBuf},
  sync::LazyLock,
};

use log::{debug, warn};
use regex::Regex;
use rome_fs::ReadOptions;

use crate::{
  document::Document,
  error::Result,
  warning::{Warning, WarningKind},
};

/// Path-absolute (`/x`, `//cdn/x`) or scheme-qualified (`https://x`)
/// references are never inlined. `data:` has no `//` and is treated as a
/// local path.
static NON_LOCAL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(
    clippy::unwrap_used,
    reason = "regex pattern is statically known to be valid"
  )]
  Regex::new(r"^(?:/|[a-z]+://)").unwrap()
});

/// Whether a `src`/`href`/`url()` value points at a local file relative to
/// its base directory.
#[must_use]
pub fn is_local_reference(reference: &str) -> bool {
  !NON_LOCAL_REFERENCE.is_match(reference)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
  Script,
  Stylesheet,
}

/// Content lifted out of one `<script>` or `<link>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
  pub kind:        SourceKind,
  /// The `src`/`href` value as written in the document.
  pub reference:   String,
  pub raw_content: String,
  /// Directory portion of `reference`, still relative to the document.
  pub base_dir:    PathBuf,
}

fn directory_of(reference: &str) -> PathBuf {
  Path::new(reference)
    .parent()
    .map(Path::to_path_buf)
    .unwrap_or_default()
}

/// Everything collected from a document.
#[derive(Debug, Default)]
pub struct Collected {
  /// Stylesheets, in document order.
  pub stylesheets: Vec<SourceRef>,
  /// Scripts that could be read, in document order.
  pub scripts:     Vec<SourceRef>,
  pub warnings:    Vec<Warning>,
}

impl Collected {
  /// Concatenated text of every collected script.
  #[must_use]
  pub fn script_text(&self) -> String {
    self
      .scripts
      .iter()
      .map(|script| script.raw_content.as_str())
      .collect()
  }
}

/// Remove every local `<script src>` and read its content.
///
/// A script that cannot be read is skipped with a warning; its tag is
/// removed regardless.
///
/// # Errors
///
/// Returns an error only if the selector machinery fails.
pub fn collect_scripts(
  doc: &Document,
  collected: &mut Collected,
) -> Result<()> {
  for script in doc.select_all("script[src]")? {
    let Some(src) = script
      .attributes
      .borrow()
      .get("src")
      .map(ToString::to_string)
    else {
      continue;
    };
    if !is_local_reference(&src) {
      debug!("Keeping non-local script {src}");
      continue;
    }

    script.as_node().detach();

    match rome_fs::read(&doc.resolve(&src), &ReadOptions::default()) {
      Ok(raw_content) => {
        debug!("Collected script {src}");
        collected.scripts.push(SourceRef {
          kind: SourceKind::Script,
          base_dir: directory_of(&src),
          reference: src,
          raw_content,
        });
      },
      Err(e) => {
        warn!("Skipping script {src}: {e}");
        collected.warnings.push(Warning::new(
          WarningKind::UnreadableScript,
          src,
          e.to_string(),
        ));
      },
    }
  }

  Ok(())
}

/// Remove every local `<link rel="stylesheet">` and read its content.
///
/// # Errors
///
/// Returns an error if a stylesheet cannot be read. Stylesheets are not
/// optional: the run aborts.
pub fn collect_stylesheets(
  doc: &Document,
  collected: &mut Collected,
) -> Result<()> {
  for link in doc.select_all(r#"link[rel="stylesheet"]"#)? {
    let Some(href) = link
      .attributes
      .borrow()
      .get("href")
      .map(ToString::to_string)
    else {
      continue;
    };
    if !is_local_reference(&href) {
      debug!("Keeping non-local stylesheet {href}");
      continue;
    }

    link.as_node().detach();

    let raw_content =
      rome_fs::read(&doc.resolve(&href), &ReadOptions::default())?;
    debug!("Collected stylesheet {href}");
    collected.stylesheets.push(SourceRef {
      kind: SourceKind::Stylesheet,
      base_dir: directory_of(&href),
      reference: href,
      raw_content,
    });
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Tests can unwrap")]

  use std::fs;

  use tempfile::tempdir;

  use super::*;
  use crate::error::InlineError;

  #[test]
  fn test_is_local_reference() {
    assert!(is_local_reference("js/app.js"));
    assert!(is_local_reference("../shared/app.js"));
    assert!(is_local_reference("data:text/javascript,alert(1)"));
    assert!(!is_local_reference("/js/app.js"));
    assert!(!is_local_reference("//cdn.example.com/app.js"));
    assert!(!is_local_reference("https://example.com/app.js"));
    // Only lowercase schemes are recognized
    assert!(is_local_reference("HTTP://example.com/app.js"));
  }

  #[test]
  fn test_collect_scripts_reads_and_removes() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("js")).unwrap();
    fs::write(dir.path().join("js/a.js"), "var a = 1;").unwrap();
    fs::write(dir.path().join("js/b.js"), "var b = 2;").unwrap();

    let doc = Document::parse(
      r#"<html><head><script src="js/a.js"></script>
      <script src="https://cdn.example.com/x.js"></script></head>
      <body><script src="js/b.js"></script></body></html>"#,
      dir.path(),
    );
    let mut collected = Collected::default();
    collect_scripts(&doc, &mut collected).unwrap();

    assert_eq!(collected.script_text(), "var a = 1;var b = 2;");
    assert_eq!(collected.scripts[0].base_dir, PathBuf::from("js"));
    assert!(collected.warnings.is_empty());

    let html = doc.serialize().unwrap();
    assert!(!html.contains("js/a.js"));
    assert!(!html.contains("js/b.js"));
    assert!(html.contains("https://cdn.example.com/x.js"));
  }

  #[test]
  fn test_unreadable_script_is_a_warning() {
    let dir = tempdir().unwrap();
    let doc = Document::parse(
      r#"<html><body><script src="missing.js"></script></body></html>"#,
      dir.path(),
    );
    let mut collected = Collected::default();
    collect_scripts(&doc, &mut collected).unwrap();

    assert!(collected.scripts.is_empty());
    assert_eq!(collected.warnings.len(), 1);
    assert_eq!(collected.warnings[0].kind, WarningKind::UnreadableScript);
    assert_eq!(collected.warnings[0].reference, "missing.js");
    assert!(!doc.serialize().unwrap().contains("missing.js"));
  }

  #[test]
  fn test_collect_stylesheets() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("css")).unwrap();
    fs::write(dir.path().join("css/site.css"), "p { color: red }").unwrap();

    let doc = Document::parse(
      r#"<html><head>
      <link rel="stylesheet" href="css/site.css">
      <link rel="stylesheet" href="/abs/site.css">
      <link rel="icon" href="favicon.ico">
      </head><body></body></html>"#,
      dir.path(),
    );
    let mut collected = Collected::default();
    collect_stylesheets(&doc, &mut collected).unwrap();

    assert_eq!(collected.stylesheets.len(), 1);
    let sheet = &collected.stylesheets[0];
    assert_eq!(sheet.kind, SourceKind::Stylesheet);
    assert_eq!(sheet.reference, "css/site.css");
    assert_eq!(sheet.base_dir, PathBuf::from("css"));
    assert_eq!(sheet.raw_content, "p { color: red }");

    let html = doc.serialize().unwrap();
    assert!(!html.contains("css/site.css"));
    assert!(html.contains("/abs/site.css"));
    assert!(html.contains("favicon.ico"));
  }

  #[test]
  fn test_unreadable_stylesheet_is_fatal() {
    let dir = tempdir().unwrap();
    let doc = Document::parse(
      r#"<html><head><link rel="stylesheet" href="gone.css"></head></html>"#,
      dir.path(),
    );
    let mut collected = Collected::default();
    assert!(matches!(
      collect_stylesheets(&doc, &mut collected),
      Err(InlineError::Fs(_))
    ));
  }
}
