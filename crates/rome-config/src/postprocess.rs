use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for HTML/CSS/JS postprocessing
///
/// Controls minification of the inlined document using specialized
/// minification libraries:
///
/// - HTML: `minify-html` - Fast, spec-compliant HTML minification
/// - CSS: `lightningcss` - Production-grade CSS parsing and minification
/// - JavaScript: `oxc_minifier` - Production-grade JavaScript minification
///
/// Everything is enabled by default; a bundled page is always minified unless
/// told otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
  /// Whether to minify the serialized document
  pub minify_html: bool,

  /// Whether to minify inline `<style>` blocks
  pub minify_css: bool,

  /// Whether to minify inline `<script>` blocks
  pub minify_js: bool,

  /// Options specific to HTML minification
  pub html: Option<HtmlMinifyOptions>,

  /// Options specific to CSS minification
  pub css: Option<CssMinifyOptions>,

  /// Options specific to JavaScript minification
  pub js: Option<JsMinifyOptions>,
}

impl Default for PostprocessConfig {
  fn default() -> Self {
    Self {
      minify_html: true,
      minify_css:  true,
      minify_js:   true,
      html:        None,
      css:         None,
      js:          None,
    }
  }
}

/// Options for HTML minification
///
/// These control `minify-html` behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlMinifyOptions {
  /// Remove HTML comments
  ///
  /// When enabled, removes all HTML comments from the output, including the
  /// ones wrapping CDATA sections.
  pub remove_comments: bool,
}

impl Default for HtmlMinifyOptions {
  fn default() -> Self {
    Self {
      remove_comments: true,
    }
  }
}

/// Options for CSS minification
///
/// These control `lightningcss` behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CssMinifyOptions {
  /// Enable minification
  ///
  /// When enabled, applies CSS minification including whitespace removal,
  /// shorthand properties, and other optimizations. When disabled, inline
  /// styles are still re-printed in canonical form.
  pub minify: bool,
}

impl Default for CssMinifyOptions {
  fn default() -> Self {
    Self { minify: true }
  }
}

/// Options for JavaScript minification
///
/// These control `oxc_minifier` behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsMinifyOptions {
  /// Enable compression optimizations
  ///
  /// When enabled, applies transformations like dead code elimination,
  /// constant folding, and expression simplification.
  pub compress: bool,

  /// Enable name mangling
  ///
  /// When enabled, shortens variable and function names to reduce file size.
  pub mangle: bool,
}

impl Default for JsMinifyOptions {
  fn default() -> Self {
    Self {
      compress: true,
      mangle:   true,
    }
  }
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_ascii_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => Ok(true),
    "false" | "no" | "off" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'"
      )))
    },
  }
}

fn unknown_key(key: &str) -> ConfigError {
  ConfigError::Config(format!(
    "Unknown configuration key: '{key}'. See documentation for supported \
     keys."
  ))
}

impl PostprocessConfig {
  /// Get HTML minify options or default
  #[must_use]
  pub fn html_options(&self) -> HtmlMinifyOptions {
    self.html.clone().unwrap_or_default()
  }

  /// Get CSS minify options or default
  #[must_use]
  pub fn css_options(&self) -> CssMinifyOptions {
    self.css.clone().unwrap_or_default()
  }

  /// Get JavaScript minify options or default
  #[must_use]
  pub fn js_options(&self) -> JsMinifyOptions {
    self.js.clone().unwrap_or_default()
  }

  /// Apply a single `KEY=VALUE` override. `key` is relative to the
  /// `postprocess` table, e.g. `minify_js` or `html.remove_comments`.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value is not a boolean.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let flag = parse_bool(key, value)?;
    match key {
      "minify_html" => self.minify_html = flag,
      "minify_css" => self.minify_css = flag,
      "minify_js" => self.minify_js = flag,
      "html.remove_comments" => {
        self.html.get_or_insert_with(Default::default).remove_comments = flag;
      },
      "css.minify" => {
        self.css.get_or_insert_with(Default::default).minify = flag;
      },
      "js.compress" => {
        self.js.get_or_insert_with(Default::default).compress = flag;
      },
      "js.mangle" => {
        self.js.get_or_insert_with(Default::default).mangle = flag;
      },
      _ => return Err(unknown_key(key)),
    }
    Ok(())
  }

  /// Merge another config into this one. Plain fields are replaced, nested
  /// tables are replaced only when `other` sets them.
  pub fn merge_fields(&mut self, other: Self) {
    self.minify_html = other.minify_html;
    self.minify_css = other.minify_css;
    self.minify_js = other.minify_js;
    if other.html.is_some() {
      self.html = other.html;
    }
    if other.css.is_some() {
      self.css = other.css;
    }
    if other.js.is_some() {
      self.js = other.js;
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Tests can unwrap")]

  use super::*;

  #[test]
  fn test_postprocess_config_defaults_enable_everything() {
    let config = PostprocessConfig::default();
    assert!(config.minify_html && config.minify_css && config.minify_js);
    assert!(config.html_options().remove_comments);
    assert!(config.css_options().minify);
    assert!(config.js_options().compress && config.js_options().mangle);
  }

  #[test]
  fn test_postprocess_config_apply_override_bools() {
    let mut config = PostprocessConfig::default();

    config.apply_override("minify_html", "false").unwrap();
    assert!(!config.minify_html);

    config.apply_override("minify_css", "no").unwrap();
    assert!(!config.minify_css);

    config.apply_override("minify_js", "0").unwrap();
    assert!(!config.minify_js);
  }

  #[test]
  fn test_postprocess_config_nested_overrides() {
    let mut config = PostprocessConfig::default();

    config
      .apply_override("html.remove_comments", "false")
      .unwrap();
    assert!(!config.html.as_ref().unwrap().remove_comments);

    config.apply_override("css.minify", "false").unwrap();
    assert!(!config.css.as_ref().unwrap().minify);

    config.apply_override("js.mangle", "false").unwrap();
    let js = config.js.as_ref().unwrap();
    assert!(!js.mangle);
    assert!(js.compress);
  }

  #[test]
  fn test_postprocess_config_rejects_bad_input() {
    let mut config = PostprocessConfig::default();
    assert!(config.apply_override("minify_html", "maybe").is_err());
    assert!(config.apply_override("minify_svg", "true").is_err());
  }

  #[test]
  fn test_postprocess_config_nested_merge() {
    let mut config = PostprocessConfig {
      html: Some(HtmlMinifyOptions {
        remove_comments: true,
      }),
      js: Some(JsMinifyOptions {
        compress: false,
        mangle:   false,
      }),
      ..Default::default()
    };

    let other = PostprocessConfig {
      minify_css: false,
      html: Some(HtmlMinifyOptions {
        remove_comments: false,
      }),
      ..Default::default()
    };

    config.merge_fields(other);

    assert!(!config.minify_css);
    assert!(!config.html.unwrap().remove_comments);
    // Left alone because `other` did not set it
    assert!(!config.js.unwrap().compress);
  }
}
