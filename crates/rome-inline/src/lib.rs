//! Bundle an HTML document and its local assets into one self-contained,
//! minified file.
//!
//! A run loads the document, pulls out every local `<script src>` and
//! `<link rel="stylesheet">`, rebases `url()` references inside the collected
//! stylesheets, embeds the results as a single `<style>` and a single
//! `<script>`, turns marked images into `data:` URIs and minifies the lot.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let html = rome_inline::inline_html(Path::new("site/index.html"), None)?;
//! # Ok::<(), rome_inline::InlineError>(())
//! ```
pub mod collect;
pub mod document;
pub mod embed;
pub mod error;
pub mod pipeline;
pub mod postprocess;
pub mod rewrite;
pub mod warning;

pub use document::Document;
pub use error::{InlineError, Result};
pub use pipeline::{InlineOutput, Inliner, inline_html};
pub use warning::{Warning, WarningKind};
