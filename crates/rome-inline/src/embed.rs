//! Putting collected content back into the document.

use std::path::Path;

use base64::Engine;
use log::debug;
use markup5ever::local_name;

use crate::{
  document::{Document, text_element},
  error::Result,
};

/// MIME type for an embedded file, by extension.
#[must_use]
pub fn mime_type_of(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .unwrap_or("")
    .to_ascii_lowercase();

  match ext.as_str() {
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "svg" => "image/svg+xml",
    "webp" => "image/webp",
    "avif" => "image/avif",
    "bmp" => "image/bmp",
    "ico" => "image/x-icon",
    _ => "application/octet-stream",
  }
}

/// `data:<mime>;base64,<payload>` for the given bytes.
#[must_use]
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
  let mut uri = String::with_capacity(
    mime.len() + 13 + base64::encoded_len(bytes.len(), true).unwrap_or(0),
  );
  uri.push_str("data:");
  uri.push_str(mime);
  uri.push_str(";base64,");
  base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut uri);
  uri
}

/// Append `css` as one `<style>` at the end of `<head>`. Nothing is added
/// for empty input.
pub fn embed_styles(doc: &Document, css: &str) {
  if css.is_empty() {
    return;
  }
  if !doc.append_to("html > head", text_element(local_name!("style"), css)) {
    debug!("Document has no <head>; dropping collected styles");
  }
}

/// Append `js` as one `<script>` at the end of `<body>`. Nothing is added
/// for empty input.
pub fn embed_scripts(doc: &Document, js: &str) {
  if js.is_empty() {
    return;
  }
  if !doc.append_to("html > body", text_element(local_name!("script"), js)) {
    debug!("Document has no <body>; dropping collected scripts");
  }
}

/// Replace the `src` of every `<img>` carrying `marker` with a base64 data
/// URI of the referenced file, removing the marker. Returns how many images
/// were embedded.
///
/// # Errors
///
/// Returns an error if a marked image cannot be read.
pub fn embed_images(doc: &Document, marker: &str) -> Result<usize> {
  // Attribute names are lowercased by the parser
  let marker = marker.to_ascii_lowercase();
  let mut embedded = 0;

  for img in doc.select_all("img")? {
    let mut attributes = img.attributes.borrow_mut();
    if !attributes.contains(marker.as_str()) {
      continue;
    }
    attributes.remove(marker.as_str());

    let Some(src) = attributes.get("src").map(ToString::to_string) else {
      debug!("Marked <img> has no src; only the marker was removed");
      continue;
    };

    let path = doc.resolve(&src);
    let bytes = rome_fs::read_bytes(&path)?;
    debug!("Embedding {src} ({} bytes)", bytes.len());
    attributes.insert("src", data_uri(mime_type_of(&path), &bytes));
    embedded += 1;
  }

  Ok(embedded)
}
