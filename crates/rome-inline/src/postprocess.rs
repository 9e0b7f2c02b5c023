use kuchikikiki::NodeRef;
use log::warn;
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use rome_config::PostprocessConfig;

use crate::{
  document::Document,
  error::{InlineError, Result},
  warning::{Warning, WarningKind},
};

/// Apply HTML minification if enabled
///
/// # Arguments
///
/// * `content` - HTML content to process
/// * `config` - Postprocessing configuration controlling minification behavior
///
/// # Returns
///
/// Returns the original content unchanged if `config.minify_html` is `false`,
/// otherwise returns minified HTML. Tag and attribute case is preserved.
#[must_use]
pub fn process_html(content: &str, config: &PostprocessConfig) -> String {
  if !config.minify_html {
    return content.to_string();
  }

  let html_opts = config.html_options();

  let cfg = minify_html::Cfg {
    keep_comments: !html_opts.remove_comments,
    ..minify_html::Cfg::default()
  };

  let minified = minify_html::minify(content.as_bytes(), &cfg);
  String::from_utf8_lossy(&minified).into_owned()
}

/// Apply CSS minification if enabled
///
/// # Arguments
///
/// * `content` - CSS content to process
/// * `config` - Postprocessing configuration controlling minification behavior
///
/// # Returns
///
/// Returns the original content unchanged if `config.minify_css` is `false`,
/// otherwise returns minified CSS.
///
/// # Errors
///
/// Returns an error if:
/// - The CSS cannot be parsed (syntax errors)
/// - The minification process fails
pub fn process_css(
  content: &str,
  config: &PostprocessConfig,
) -> Result<String> {
  if !config.minify_css {
    return Ok(content.to_string());
  }

  let css_opts = config.css_options();
  let css_error = |message: String| {
    InlineError::Minify {
      language: "CSS",
      message,
    }
  };

  let stylesheet = lightningcss::stylesheet::StyleSheet::parse(
    content,
    lightningcss::stylesheet::ParserOptions::default(),
  )
  .map_err(|e| css_error(format!("parse error: {e}")))?;

  let result = stylesheet
    .to_css(lightningcss::stylesheet::PrinterOptions {
      minify: css_opts.minify,
      ..Default::default()
    })
    .map_err(|e| css_error(e.to_string()))?;

  Ok(result.code)
}

/// Apply JavaScript minification if enabled
///
/// # Arguments
///
/// * `content` - JavaScript content to process
/// * `source_type` - Whether the code is a classic script or an ES module
/// * `config` - Postprocessing configuration controlling minification behavior
///
/// # Returns
///
/// Returns the original content unchanged if `config.minify_js` is `false`,
/// otherwise returns minified JavaScript.
///
/// # Errors
///
/// Returns an error if the JavaScript cannot be parsed.
pub fn process_js(
  content: &str,
  source_type: SourceType,
  config: &PostprocessConfig,
) -> Result<String> {
  if !config.minify_js {
    return Ok(content.to_string());
  }

  let allocator = Allocator::default();

  let ret = Parser::new(&allocator, content, source_type).parse();

  if !ret.errors.is_empty() {
    return Err(InlineError::Minify {
      language: "JavaScript",
      message:  format!(
        "parse error: {}",
        ret
          .errors
          .iter()
          .map(std::string::ToString::to_string)
          .collect::<Vec<_>>()
          .join(", ")
      ),
    });
  }

  let mut program = ret.program;

  let js_opts = config.js_options();

  let minifier_options = MinifierOptions {
    compress: if js_opts.compress {
      Some(CompressOptions::default())
    } else {
      None
    },
    mangle:   if js_opts.mangle {
      Some(MangleOptions::default())
    } else {
      None
    },
  };

  let minifier = Minifier::new(minifier_options);
  minifier.minify(&allocator, &mut program);

  let codegen_options = CodegenOptions::minify();
  let printed = Codegen::new().with_options(codegen_options).build(&program);

  Ok(printed.code)
}

/// Source type for an inline `<script>`, or `None` when its `type` is not
/// JavaScript (JSON blobs, templates and the like are left alone).
fn script_source_type(type_attr: Option<&str>) -> Option<SourceType> {
  match type_attr.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
    None
    | Some(
      "" | "text/javascript" | "application/javascript" | "text/ecmascript"
      | "application/ecmascript",
    ) => Some(SourceType::cjs()),
    Some("module") => Some(SourceType::mjs()),
    _ => None,
  }
}

fn replace_text(node: &NodeRef, text: &str) {
  for child in node.children().collect::<Vec<_>>() {
    child.detach();
  }
  node.append(NodeRef::new_text(text));
}

/// Minify every inline `<style>` and `<script>` block in place.
///
/// A block that fails to minify is kept verbatim and reported as a warning.
///
/// # Errors
///
/// Returns an error only if the selector machinery fails.
pub fn minify_inline_blocks(
  doc: &Document,
  config: &PostprocessConfig,
  warnings: &mut Vec<Warning>,
) -> Result<()> {
  if config.minify_css {
    for (index, style) in doc.select_all("style")?.into_iter().enumerate() {
      let node = style.as_node();
      let css = node.text_contents();
      if css.trim().is_empty() {
        continue;
      }
      match process_css(&css, config) {
        Ok(minified) => replace_text(node, &minified),
        Err(e) => {
          let reference = format!("<style> #{}", index + 1);
          warn!("Leaving {reference} unminified: {e}");
          warnings.push(Warning::new(
            WarningKind::CssMinify,
            reference,
            e.to_string(),
          ));
        },
      }
    }
  }

  if config.minify_js {
    for (index, script) in doc.select_all("script")?.into_iter().enumerate() {
      let source_type = {
        let attributes = script.attributes.borrow();
        if attributes.contains("src") {
          continue;
        }
        script_source_type(attributes.get("type"))
      };
      let Some(source_type) = source_type else {
        continue;
      };

      let node = script.as_node();
      let js = node.text_contents();
      if js.trim().is_empty() {
        continue;
      }
      match process_js(&js, source_type, config) {
        Ok(minified) => replace_text(node, &minified),
        Err(e) => {
          let reference = format!("<script> #{}", index + 1);
          warn!("Leaving {reference} unminified: {e}");
          warnings.push(Warning::new(
            WarningKind::JsMinify,
            reference,
            e.to_string(),
          ));
        },
      }
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Tests can unwrap")]

  use rome_config::postprocess::{
    CssMinifyOptions,
    HtmlMinifyOptions,
    JsMinifyOptions,
  };

  use super::*;

  fn disabled() -> PostprocessConfig {
    PostprocessConfig {
      minify_html: false,
      minify_css: false,
      minify_js: false,
      ..Default::default()
    }
  }

  #[test]
  fn test_html_minification_disabled() {
    let html = "<html>  <body>  Test  </body>  </html>";
    assert_eq!(process_html(html, &disabled()), html);
  }

  #[test]
  fn test_html_minification_enabled() {
    let config = PostprocessConfig::default();
    let html = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <title>Test</title>
  </head>
  <body>
    <pre>code    with    spaces</pre>
    <div><!-- Comment -->Content</div>
  </body>
</html>"#;
    let result = process_html(html, &config);

    assert!(result.len() < html.len());
    assert!(result.contains("charset"));
    assert!(result.contains("code    with    spaces")); // <pre> preserves whitespace
    assert!(!result.contains("<!-- Comment -->")); // Comments removed by default
    assert!(result.contains("Content"));
  }

  #[test]
  fn test_html_remove_comments_option() {
    let config = PostprocessConfig {
      html: Some(HtmlMinifyOptions {
        remove_comments: false,
      }),
      ..Default::default()
    };
    let html = "<div><!-- Keep -->Content</div>";
    assert!(process_html(html, &config).contains("<!-- Keep -->"));
  }

  #[test]
  fn test_css_minification_disabled() {
    let css = "body { color: red; }";
    assert_eq!(process_css(css, &disabled()).unwrap(), css);
  }

  #[test]
  fn test_css_minification_enabled() {
    let config = PostprocessConfig::default();
    let css = r"
/* Comment */
body {
  color: #ff0000;
  margin: 0;
}

@media (max-width: 768px) {
  .container { width: 100%; }
}
";
    let result = process_css(css, &config).unwrap();

    assert!(result.len() < css.len());
    assert!(!result.contains("/*"));
    assert!(!result.contains('\n'));
    assert!(result.contains("@media"));
    // lightningcss optimizes #ff0000 to red
    assert!(result.contains("red") || result.contains("#f00"));
  }

  #[test]
  fn test_css_minify_option() {
    let css = "body { color: red; }";

    let config_minify = PostprocessConfig {
      css: Some(CssMinifyOptions { minify: true }),
      ..Default::default()
    };
    let result_minify = process_css(css, &config_minify).unwrap();

    // Still parsed and re-printed, just not compacted
    let config_no_minify = PostprocessConfig {
      css: Some(CssMinifyOptions { minify: false }),
      ..Default::default()
    };
    let result_no_minify = process_css(css, &config_no_minify).unwrap();

    assert!(result_no_minify.len() >= result_minify.len());
  }

  #[test]
  fn test_css_invalid_syntax() {
    let config = PostprocessConfig::default();
    let css = "body { @@@invalid: syntax; }";
    let result = process_css(css, &config);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("parse"));
  }

  #[test]
  fn test_js_minification_disabled() {
    let js = "function test() { return true; }";
    assert_eq!(process_js(js, SourceType::cjs(), &disabled()).unwrap(), js);
  }

  #[test]
  fn test_js_minification_enabled() {
    let config = PostprocessConfig::default();

    let js = r"
// Initialize app
function init() {
  const x = 5 + 10 * 2;
  console.log('test');
  console.log(x);
}
window.addEventListener('load', function() {
  init();
});
";
    let result = process_js(js, SourceType::mjs(), &config).unwrap();

    assert!(result.len() < js.len());
    assert!(result.contains("25")); // Constant folding: 5 + 10 * 2
    assert!(result.contains("console.log"));
    assert!(result.contains("addEventListener"));
  }

  #[test]
  fn test_js_mangle_option() {
    let js = "function test() { const localVar = 1; return localVar + 1; }";

    let config_no_mangle = PostprocessConfig {
      js: Some(JsMinifyOptions {
        compress: false,
        mangle:   false,
      }),
      ..Default::default()
    };
    let result = process_js(js, SourceType::cjs(), &config_no_mangle).unwrap();

    // Without mangle, original names are preserved
    assert!(result.contains("localVar"));
  }

  #[test]
  fn test_js_invalid_syntax() {
    let config = PostprocessConfig::default();
    let js = "function test() { @@@invalid }";
    let result = process_js(js, SourceType::cjs(), &config);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("parse"));
  }

  #[test]
  fn test_script_source_type() {
    assert_eq!(script_source_type(None), Some(SourceType::cjs()));
    assert_eq!(
      script_source_type(Some("text/JavaScript")),
      Some(SourceType::cjs())
    );
    assert_eq!(script_source_type(Some("module")), Some(SourceType::mjs()));
    assert_eq!(script_source_type(Some("application/json")), None);
  }

  #[test]
  fn test_minify_inline_blocks() {
    let doc = Document::parse(
      r#"<html><head><style>
        body {
          color: #ff0000;
        }
      </style></head><body>
      <script>
        var total = 5 + 10;
        console.log(total);
      </script>
      <script type="application/json">{ "keep":   "as is" }</script>
      </body></html>"#,
      "",
    );
    let mut warnings = Vec::new();
    minify_inline_blocks(&doc, &PostprocessConfig::default(), &mut warnings)
      .unwrap();

    assert!(warnings.is_empty());
    let html = doc.serialize().unwrap();
    assert!(html.contains("<style>body{color:red}</style>"), "{html}");
    assert!(!html.contains("5 + 10"));
    assert!(html.contains(r#"{ "keep":   "as is" }"#));
  }

  #[test]
  fn test_broken_inline_block_is_a_warning() {
    let doc = Document::parse(
      "<html><body><script>function ( {</script></body></html>",
      "",
    );
    let mut warnings = Vec::new();
    minify_inline_blocks(&doc, &PostprocessConfig::default(), &mut warnings)
      .unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::JsMinify);
    assert!(doc.serialize().unwrap().contains("function ( {"));
  }
}
