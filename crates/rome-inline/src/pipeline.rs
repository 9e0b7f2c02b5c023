use std::path::{Path, PathBuf};

use log::{debug, info};
use rome_config::Config;
use rome_fs::WriteOptions;

use crate::{
  collect::{self, Collected},
  document::Document,
  embed,
  error::Result,
  postprocess,
  rewrite,
  warning::Warning,
};

/// Result of one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineOutput {
  /// The minified, self-contained document.
  pub html:     String,
  /// Non-fatal events, in the order they happened.
  pub warnings: Vec<Warning>,
  /// Where the document was written, if a destination was given.
  pub written:  Option<PathBuf>,
}

/// Bundles an HTML file and its local assets into a single document.
#[derive(Debug, Clone, Default)]
pub struct Inliner {
  config: Config,
}

impl Inliner {
  #[must_use]
  pub const fn new(config: Config) -> Self {
    Self { config }
  }

  #[must_use]
  pub const fn config(&self) -> &Config {
    &self.config
  }

  /// Inline everything `source` references and minify the result.
  ///
  /// When `dest` is given it is resolved against the directory of `source`
  /// and the result is written there, creating parent directories as
  /// needed. The returned HTML is byte-identical to what was written.
  ///
  /// # Errors
  ///
  /// Returns an error if the document, a stylesheet or a marked image cannot
  /// be read, if a stylesheet cannot be parsed, or if the output cannot be
  /// written. Unreadable scripts are reported in
  /// [`InlineOutput::warnings`] instead.
  pub fn inline(
    &self,
    source: &Path,
    dest: Option<&Path>,
  ) -> Result<InlineOutput> {
    info!("Inlining {}", source.display());
    let doc = Document::load(source)?;
    let base_path = doc.base_path().to_path_buf();

    let mut collected = Collected::default();
    collect::collect_scripts(&doc, &mut collected)?;
    collect::collect_stylesheets(&doc, &mut collected)?;
    debug!(
      "Collected {} script(s) and {} stylesheet(s)",
      collected.scripts.len(),
      collected.stylesheets.len()
    );

    let css = rewrite::combine_stylesheets(&collected.stylesheets, &base_path)?;
    let js = collected.script_text();
    let mut warnings = std::mem::take(&mut collected.warnings);

    embed::embed_styles(&doc, &css);
    embed::embed_scripts(&doc, &js);
    let images = embed::embed_images(&doc, &self.config.embed_attribute)?;
    if images > 0 {
      debug!("Embedded {images} image(s)");
    }

    let minify = &self.config.postprocess;
    postprocess::minify_inline_blocks(&doc, minify, &mut warnings)?;
    let html = postprocess::process_html(&doc.serialize()?, minify);

    let written = match dest {
      Some(dest) => {
        let path = rome_fs::resolve(&base_path, dest);
        rome_fs::write(&path, &html, &WriteOptions::default())?;
        info!("Wrote {} ({} bytes)", path.display(), html.len());
        Some(path)
      },
      None => None,
    };

    Ok(InlineOutput {
      html,
      warnings,
      written,
    })
  }
}

/// Inline `source` with the default configuration and return the resulting
/// document, optionally writing it to `dest` as well.
///
/// # Errors
///
/// See [`Inliner::inline`].
pub fn inline_html(source: &Path, dest: Option<&Path>) -> Result<String> {
  Inliner::default()
    .inline(source, dest)
    .map(|output| output.html)
}
