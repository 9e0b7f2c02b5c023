//! Stylesheet rewriting: rebase relative `url()` references so they keep
//! pointing at the same files once the CSS moves into the document.

use std::{
  convert::Infallible,
  path::Path,
  sync::LazyLock,
};

use lightningcss::{
  properties::Property,
  stylesheet::{ParserOptions, PrinterOptions, StyleSheet},
  values::url::Url,
  visit_types,
  visitor::{Visit, VisitTypes, Visitor},
};
use log::trace;
use regex::Regex;

use crate::{
  collect::{SourceRef, is_local_reference},
  error::{InlineError, Result},
};

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
  #[allow(
    clippy::unwrap_used,
    reason = "regex pattern is statically known to be valid"
  )]
  Regex::new(r#"url\(['"]?([^)'"]+)['"]?\)"#).unwrap()
});

/// Whether a declaration may have its `url()` rebased.
///
/// Any `background*` property qualifies. `border-image*` qualifies only when
/// its value mentions `url`.
#[must_use]
pub fn is_rebasable(property: &str, value: &str) -> bool {
  property.starts_with("background")
    || (property.starts_with("border-image") && value.contains("url"))
}

/// Path of `base_path/base_dir/url` expressed relative to `base_path`, with
/// `/` separators.
#[must_use]
pub fn rebase_url(base_path: &Path, base_dir: &Path, url: &str) -> String {
  let target = rome_fs::normalize(&base_path.join(base_dir).join(url));
  let from = rome_fs::normalize(base_path);
  let relative = pathdiff::diff_paths(&target, &from)
    .unwrap_or_else(|| rome_fs::normalize(&base_dir.join(url)));
  rome_fs::unixify(&relative)
}

/// First `url(...)` target found in a printed declaration value.
fn first_url(value: &str) -> Option<&str> {
  CSS_URL
    .captures(value)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

struct UrlRebaser<'a> {
  base_path: &'a Path,
  base_dir:  &'a Path,
  /// Replacement for the next URL visited inside the current declaration.
  pending:   Option<String>,
  rewritten: usize,
}

impl<'i> Visitor<'i> for UrlRebaser<'_> {
  type Error = Infallible;

  fn visit_types(&self) -> VisitTypes {
    visit_types!(PROPERTIES | URLS)
  }

  fn visit_property(
    &mut self,
    property: &mut Property<'i>,
  ) -> std::result::Result<(), Self::Error> {
    let name = property.property_id().name().to_string();
    let Ok(value) = property.value_to_css_string(PrinterOptions::default())
    else {
      return Ok(());
    };
    if !is_rebasable(&name, &value) {
      return Ok(());
    }
    let Some(url) = first_url(&value) else {
      return Ok(());
    };
    if !is_local_reference(url) {
      return Ok(());
    }

    self.pending = Some(rebase_url(self.base_path, self.base_dir, url));
    let visited = property.visit_children(self);
    self.pending = None;
    visited
  }

  fn visit_url(
    &mut self,
    url: &mut Url<'i>,
  ) -> std::result::Result<(), Self::Error> {
    // Only the first url() of a declaration is rebased
    if let Some(rebased) = self.pending.take() {
      trace!("Rebasing url({}) to url({rebased})", url.url);
      url.url = rebased.into();
      self.rewritten += 1;
    }
    Ok(())
  }
}

/// Parse one collected stylesheet, rebase its eligible `url()` references
/// and print it back out.
///
/// # Errors
///
/// Returns an error if the stylesheet cannot be parsed or printed.
pub fn rewrite_stylesheet(
  source: &SourceRef,
  base_path: &Path,
) -> Result<String> {
  let css_error = |message: String| {
    InlineError::Css {
      file: source.reference.clone(),
      message,
    }
  };

  let mut stylesheet = StyleSheet::parse(&source.raw_content, ParserOptions {
    filename: source.reference.clone(),
    error_recovery: true,
    ..ParserOptions::default()
  })
  .map_err(|e| css_error(e.to_string()))?;

  let mut rebaser = UrlRebaser {
    base_path,
    base_dir: &source.base_dir,
    pending: None,
    rewritten: 0,
  };
  let Ok(()) = stylesheet.visit(&mut rebaser);
  log::debug!(
    "Rebased {} url reference(s) in {}",
    rebaser.rewritten,
    source.reference
  );

  stylesheet
    .to_css(PrinterOptions::default())
    .map(|printed| printed.code)
    .map_err(|e| css_error(e.to_string()))
}

/// Rewrite every stylesheet and join them, in order, into a single block.
///
/// # Errors
///
/// Returns the first stylesheet error encountered.
pub fn combine_stylesheets(
  sources: &[SourceRef],
  base_path: &Path,
) -> Result<String> {
  let mut combined = String::new();
  for source in sources {
    combined.push_str(&rewrite_stylesheet(source, base_path)?);
  }
  Ok(combined)
}
