//! Loading, querying and serializing the document being bundled.

use std::path::{Path, PathBuf};

use kuchikikiki::{ElementData, NodeDataRef, NodeRef};
use markup5ever::{LocalName, QualName, ns};
use rome_fs::ReadOptions;
use tendril::TendrilSink;

use crate::error::{InlineError, Result};

/// A parsed HTML document together with the directory its relative
/// references resolve against.
///
/// The handle is owned by a single pipeline run; nothing about it is global.
pub struct Document {
  root:      NodeRef,
  base_path: PathBuf,
}

impl std::fmt::Debug for Document {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Document")
      .field("base_path", &self.base_path)
      .finish_non_exhaustive()
  }
}

/// Directory portion of `path`. Empty for a bare file name, which then
/// resolves against the process working directory.
#[must_use]
pub fn base_dir_of(path: &Path) -> PathBuf {
  path.parent().map(Path::to_path_buf).unwrap_or_default()
}

impl Document {
  /// Read and parse the HTML file at `source`.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read.
  pub fn load(source: &Path) -> Result<Self> {
    let html = rome_fs::read(source, &ReadOptions::default())?;
    log::debug!("Loaded {} ({} bytes)", source.display(), html.len());
    Ok(Self::parse(&html, base_dir_of(source)))
  }

  /// Parse an in-memory document whose references resolve against
  /// `base_path`.
  #[must_use]
  pub fn parse(html: &str, base_path: impl Into<PathBuf>) -> Self {
    Self {
      root:      kuchikikiki::parse_html().one(html),
      base_path: base_path.into(),
    }
  }

  #[must_use]
  pub fn root(&self) -> &NodeRef {
    &self.root
  }

  #[must_use]
  pub fn base_path(&self) -> &Path {
    &self.base_path
  }

  /// Resolve a reference found in the document against its base path.
  #[must_use]
  pub fn resolve(&self, reference: &str) -> PathBuf {
    rome_fs::resolve(&self.base_path, Path::new(reference))
  }

  /// All elements matching `selector`, in document order.
  ///
  /// The matches are collected up front so callers may detach them while
  /// iterating.
  ///
  /// # Errors
  ///
  /// Returns an error if the selector does not parse.
  pub fn select_all(
    &self,
    selector: &str,
  ) -> Result<Vec<NodeDataRef<ElementData>>> {
    self
      .root
      .select(selector)
      .map(Iterator::collect)
      .map_err(|()| InlineError::Selector(selector.to_string()))
  }

  /// Append `child` as the last child of the first element matching
  /// `parent`. Returns whether such an element existed.
  pub fn append_to(&self, parent: &str, child: NodeRef) -> bool {
    match self.root.select_first(parent) {
      Ok(element) => {
        element.as_node().append(child);
        true
      },
      Err(()) => false,
    }
  }

  /// Serialize the whole tree back to HTML.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails.
  pub fn serialize(&self) -> Result<String> {
    let mut out = Vec::new();
    self.root.serialize(&mut out)?;
    String::from_utf8(out).map_err(|e| {
      InlineError::Serialize(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        e,
      ))
    })
  }
}

/// Build an attribute-less HTML element holding `text`, such as an inline
/// `<style>` or `<script>`.
#[must_use]
pub fn text_element(name: LocalName, text: &str) -> NodeRef {
  let element =
    NodeRef::new_element(QualName::new(None, ns!(html), name), Vec::new());
  element.append(NodeRef::new_text(text));
  element
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Tests can unwrap")]

  use markup5ever::local_name;

  use super::*;

  #[test]
  fn test_base_dir_of() {
    assert_eq!(
      base_dir_of(Path::new("/site/index.html")),
      PathBuf::from("/site")
    );
    assert_eq!(base_dir_of(Path::new("index.html")), PathBuf::new());
  }

  #[test]
  fn test_resolve_against_base() {
    let doc = Document::parse("<p>x</p>", "/site");
    assert_eq!(doc.resolve("js/../app.js"), PathBuf::from("/site/app.js"));
  }

  #[test]
  fn test_append_and_serialize() {
    let doc = Document::parse(
      "<!DOCTYPE html><html><head></head><body></body></html>",
      "",
    );
    assert!(doc.append_to("html > head", text_element(local_name!("style"), "p{}")));
    assert!(!doc.append_to("html > footer", text_element(local_name!("script"), "")));

    let html = doc.serialize().unwrap();
    assert!(html.contains("<head><style>p{}</style></head>"));
  }

  #[test]
  fn test_select_all_rejects_bad_selector() {
    let doc = Document::parse("<p>x</p>", "");
    assert!(matches!(
      doc.select_all("p[").unwrap_err(),
      InlineError::Selector(_)
    ));
  }
}
